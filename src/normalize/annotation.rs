/// Annotation normalization
///
/// The summary returned to callers deduplicates by label within one engine's
/// detection list (first occurrence wins). Persistence is separate: every
/// raw item still upserts its own row, so repeat labels at different
/// confidences remain in the store. The two views are intentionally not
/// unified.
use crate::providers::vision::RawDetection;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Bounding box of a detection, when the engine reports one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub width: f64,
    pub height: f64,
}

/// Summarized annotation for one detected label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub label: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

/// Extract the bounding box of a raw detection if fully specified
pub fn bounding_box(raw: &RawDetection) -> Option<BoundingBox> {
    Some(BoundingBox {
        x_min: raw.x_min?,
        x_max: raw.x_max?,
        y_min: raw.y_min?,
        y_max: raw.y_max?,
        width: raw.width?,
        height: raw.height?,
    })
}

/// Summarize one engine's detections, first occurrence of a label wins
pub fn summarize_engine(items: &[RawDetection]) -> Vec<Annotation> {
    let mut seen = HashSet::new();
    let mut summary = Vec::new();

    for raw in items {
        if !seen.insert(raw.label.clone()) {
            continue;
        }
        summary.push(Annotation {
            label: raw.label.clone(),
            confidence: raw.confidence,
            bounding_box: bounding_box(raw),
        });
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(label: &str, confidence: f64) -> RawDetection {
        RawDetection {
            label: label.to_string(),
            confidence,
            x_min: Some(0.1),
            x_max: Some(0.9),
            y_min: Some(0.2),
            y_max: Some(0.8),
            width: Some(0.8),
            height: Some(0.6),
        }
    }

    #[test]
    fn test_summary_dedupes_by_label_first_wins() {
        let items = vec![
            detection("plate", 0.97),
            detection("fork", 0.91),
            detection("plate", 0.42),
        ];

        let summary = summarize_engine(&items);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].label, "plate");
        assert_eq!(summary[0].confidence, 0.97);
        assert_eq!(summary[1].label, "fork");
    }

    #[test]
    fn test_bounding_box_requires_all_fields() {
        let mut raw = detection("plate", 0.9);
        raw.width = None;
        assert!(bounding_box(&raw).is_none());

        let raw = detection("plate", 0.9);
        assert!(bounding_box(&raw).is_some());
    }
}
