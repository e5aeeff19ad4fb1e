// Decoder for WFS "multipointcoverage" observation documents
//
// The document carries three independent blocks: point definitions, a field
// list giving the column order, and a tuple list with one whitespace separated
// line per station per time step, cycling through stations in point order.
use crate::domain::buoy::{StationPosition, StationRecord};
use roxmltree::{Document, Node};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("{rows} tuple rows cannot be split evenly across {stations} stations")]
    InconsistentRowCount { rows: usize, stations: usize },

    #[error("{rows} tuple rows but no station points")]
    RowsWithoutStations { rows: usize },
}

/// Decode a multipoint coverage document into the latest observation per
/// parameter for every station, in point-definition order.
pub fn decode_multipoint(xml: &str) -> Result<Vec<StationRecord>, DecodeError> {
    let document = Document::parse(xml)?;

    let points = parse_points(&document);
    let fields = parse_fields(&document);
    let rows = parse_rows(&document);

    if points.is_empty() {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        return Err(DecodeError::RowsWithoutStations { rows: rows.len() });
    }
    if rows.len() % points.len() != 0 {
        return Err(DecodeError::InconsistentRowCount {
            rows: rows.len(),
            stations: points.len(),
        });
    }

    // Repeated identifiers fold into the record of their first occurrence
    let mut records: Vec<StationRecord> = Vec::new();
    let mut slot_by_id: HashMap<String, usize> = HashMap::new();
    let slots: Vec<usize> = points
        .iter()
        .map(|point| {
            *slot_by_id.entry(point.id.clone()).or_insert_with(|| {
                records.push(StationRecord::new(point.clone()));
                records.len() - 1
            })
        })
        .collect();

    for (i, row) in rows.iter().enumerate() {
        let record = &mut records[slots[i % points.len()]];
        for (field, token) in fields.iter().zip(row.split_whitespace()) {
            if let Some(value) = parse_value(token) {
                record.observations.insert(field.clone(), value);
            }
        }
    }

    Ok(records)
}

fn parse_points(document: &Document) -> Vec<StationPosition> {
    document
        .descendants()
        .filter(|n| is_element(n, "Point"))
        .filter_map(|point| {
            let name = child_text(&point, "name")?;
            let (lat, lon) = parse_pos(child_text(&point, "pos")?)?;
            let id = point
                .attributes()
                .find(|a| a.name() == "id")
                .map(|a| a.value().to_string())
                .unwrap_or_else(|| name.to_string());

            Some(StationPosition {
                id,
                name: name.to_string(),
                lat,
                lon,
            })
        })
        .collect()
}

fn parse_fields(document: &Document) -> Vec<String> {
    document
        .descendants()
        .filter(|n| is_element(n, "field"))
        .filter_map(|n| n.attribute("name"))
        .map(str::to_string)
        .collect()
}

fn parse_rows<'a>(document: &'a Document) -> Vec<&'a str> {
    document
        .descendants()
        .filter(|n| is_element(n, "doubleOrNilReasonTupleList"))
        .filter_map(|n| n.text())
        .flat_map(str::lines)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// "lat lon [...]" with at least two numbers.
fn parse_pos(pos: &str) -> Option<(f64, f64)> {
    let mut numbers = pos.split_whitespace().map(|t| t.parse::<f64>());
    let lat = numbers.next()?.ok()?;
    let lon = numbers.next()?.ok()?;
    Some((lat, lon))
}

fn parse_value(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_element(node: &Node, local_name: &str) -> bool {
    node.is_element() && node.tag_name().name() == local_name
}

fn child_text<'a>(node: &Node<'a, '_>, local_name: &str) -> Option<&'a str> {
    node.descendants()
        .find(|n| is_element(n, local_name))
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{multipoint_document_with as document, point_xml as point};

    fn by_name<'a>(records: &'a [StationRecord], name: &str) -> &'a StationRecord {
        records.iter().find(|r| r.position.name == name).unwrap()
    }

    #[test]
    fn test_latest_non_missing_value_wins() {
        let xml = document(
            &[
                point("point-1", "Kata", "59.84 24.38"),
                point("point-2", "Vento", "60.12 24.97"),
            ],
            &["WaveHs", "WTP"],
            &["1.2 5.0", "0.8 4.0", "1.4 NaN", "0.9 4.2"],
        );

        let records = decode_multipoint(&xml).unwrap();

        assert_eq!(records.len(), 2);
        let kata = by_name(&records, "Kata");
        assert_eq!(kata.observations.get("WaveHs").copied(), Some(1.4));
        assert_eq!(kata.observations.get("WTP").copied(), Some(5.0));
        let vento = by_name(&records, "Vento");
        assert_eq!(vento.observations.get("WaveHs").copied(), Some(0.9));
        assert_eq!(vento.observations.get("WTP").copied(), Some(4.2));
        assert_eq!(vento.position.lat, 60.12);
        assert_eq!(vento.position.lon, 24.97);
    }

    #[test]
    fn test_non_numeric_token_never_overwrites() {
        let xml = document(
            &[point("point-1", "Kata", "59.84 24.38")],
            &["WaveHs", "TWATER"],
            &["1.1 12.5", "abc NaN", "inf -"],
        );

        let records = decode_multipoint(&xml).unwrap();

        assert_eq!(records[0].observations.get("WaveHs").copied(), Some(1.1));
        assert_eq!(records[0].observations.get("TWATER").copied(), Some(12.5));
    }

    #[test]
    fn test_even_rows_yield_one_record_per_station() {
        let points: Vec<String> = (0..3)
            .map(|i| point(&format!("point-{i}"), &format!("Buoy {i}"), "60.0 25.0"))
            .collect();
        let rows = vec!["0.5"; 12];

        let records = decode_multipoint(&document(&points, &["WaveHs"], &rows)).unwrap();

        assert_eq!(records.len(), 3);
        let ids: Vec<&str> = records.iter().map(|r| r.position.id.as_str()).collect();
        assert_eq!(ids, vec!["point-0", "point-1", "point-2"]);
    }

    #[test]
    fn test_parameter_never_observed_is_omitted() {
        let xml = document(
            &[point("point-1", "Kata", "59.84 24.38")],
            &["WaveHs", "WTP"],
            &["1.0 NaN", "1.1 NaN"],
        );

        let records = decode_multipoint(&xml).unwrap();

        assert_eq!(records[0].observations.get("WTP").copied(), None);
        assert_eq!(records[0].observations.len(), 1);
    }

    #[test]
    fn test_uneven_rows_are_rejected() {
        let xml = document(
            &[
                point("point-1", "Kata", "59.84 24.38"),
                point("point-2", "Vento", "60.12 24.97"),
            ],
            &["WaveHs"],
            &["1.0", "2.0", "3.0"],
        );

        assert!(matches!(
            decode_multipoint(&xml),
            Err(DecodeError::InconsistentRowCount { rows: 3, stations: 2 })
        ));
    }

    #[test]
    fn test_rows_without_points_are_rejected() {
        let xml = document(&[], &["WaveHs"], &["1.0"]);

        assert!(matches!(
            decode_multipoint(&xml),
            Err(DecodeError::RowsWithoutStations { rows: 1 })
        ));
    }

    #[test]
    fn test_stations_sharing_a_name_stay_distinct() {
        let xml = document(
            &[
                point("point-1", "Harmaja", "60.10 24.97"),
                point("point-2", "Harmaja", "60.11 24.98"),
            ],
            &["WaveHs"],
            &["1.0", "2.0"],
        );

        let records = decode_multipoint(&xml).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].observations.get("WaveHs").copied(), Some(1.0));
        assert_eq!(records[1].observations.get("WaveHs").copied(), Some(2.0));
    }

    #[test]
    fn test_point_without_position_is_dropped() {
        let broken = r#"<gml:Point gml:id="point-x"><gml:name>Broken</gml:name></gml:Point>"#;
        let xml = document(
            &[broken.to_string(), point("point-1", "Kata", "59.84 24.38")],
            &["WaveHs"],
            &["1.0"],
        );

        let records = decode_multipoint(&xml).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].position.name, "Kata");
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(matches!(
            decode_multipoint("<wfs:FeatureCollection><unclosed>"),
            Err(DecodeError::Xml(_))
        ));
    }
}
