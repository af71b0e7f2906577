//! Per-column configuration tables, built once before any row is processed

use indexmap::IndexMap;

/// Conversion applied to a data-row field, keyed by 0-based column index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnTransform {
    /// Keep the field as text
    PassThrough,
    /// Parse the field as a base-10 signed integer
    ParseInteger,
    /// Parse the field against `input_pattern` and display it with `output_format`
    ParseDateTime {
        input_pattern: String,
        output_format: String,
    },
}

/// Mapping from 0-based column index to its transform
///
/// Insertion order is preserved so that the number formats derived from the
/// datetime entries get stable style indices across runs.
#[derive(Debug, Default)]
pub struct TransformTable {
    transforms: IndexMap<usize, ColumnTransform>,
}

impl TransformTable {
    pub fn new() -> Self {
        TransformTable {
            transforms: IndexMap::new(),
        }
    }

    /// Register the transform for a column; each index maps to at most one
    pub fn set(&mut self, col: usize, transform: ColumnTransform) {
        self.transforms.insert(col, transform);
    }

    /// Transform for a column; a missing index means pass-through
    pub fn get(&self, col: usize) -> &ColumnTransform {
        self.transforms
            .get(&col)
            .unwrap_or(&ColumnTransform::PassThrough)
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Datetime output format codes, in directive order
    pub fn output_formats(&self) -> impl Iterator<Item = &str> {
        self.transforms.values().filter_map(|t| match t {
            ColumnTransform::ParseDateTime { output_format, .. } => Some(output_format.as_str()),
            _ => None,
        })
    }
}

/// Width applied to an inclusive range of 1-based column indices
#[derive(Debug, Clone, PartialEq)]
pub struct WidthRange {
    pub min: u32,
    pub max: u32,
    pub width: f64,
}

/// Column width declarations, kept in first-insertion order
///
/// Overlapping ranges are permitted; the sheet writer emits them as given and
/// leaves conflict resolution to the reading application.
#[derive(Debug, Default)]
pub struct ColumnWidths {
    ranges: Vec<WidthRange>,
}

impl ColumnWidths {
    pub fn new() -> Self {
        ColumnWidths { ranges: Vec::new() }
    }

    pub fn push(&mut self, range: WidthRange) {
        self.ranges.push(range);
    }

    pub fn iter(&self) -> impl Iterator<Item = &WidthRange> {
        self.ranges.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_index_is_pass_through() {
        let table = TransformTable::new();
        assert_eq!(table.get(7), &ColumnTransform::PassThrough);
    }

    #[test]
    fn test_each_index_maps_to_one_transform() {
        let mut table = TransformTable::new();
        table.set(0, ColumnTransform::ParseInteger);
        table.set(
            0,
            ColumnTransform::ParseDateTime {
                input_pattern: "%Y".to_string(),
                output_format: "yyyy".to_string(),
            },
        );
        assert!(matches!(
            table.get(0),
            ColumnTransform::ParseDateTime { .. }
        ));
    }

    #[test]
    fn test_output_formats_in_directive_order() {
        let mut table = TransformTable::new();
        table.set(
            4,
            ColumnTransform::ParseDateTime {
                input_pattern: "%d.%m.%Y".to_string(),
                output_format: "dd.mm.yyyy".to_string(),
            },
        );
        table.set(
            1,
            ColumnTransform::ParseDateTime {
                input_pattern: "%H:%M".to_string(),
                output_format: "hh:mm".to_string(),
            },
        );
        let formats: Vec<_> = table.output_formats().collect();
        assert_eq!(formats, vec!["dd.mm.yyyy", "hh:mm"]);
    }

    #[test]
    fn test_widths_keep_insertion_order_and_overlaps() {
        let mut widths = ColumnWidths::new();
        widths.push(WidthRange {
            min: 4,
            max: 6,
            width: 15.0,
        });
        widths.push(WidthRange {
            min: 5,
            max: 5,
            width: 30.0,
        });
        let ranges: Vec<_> = widths.iter().cloned().collect();
        assert_eq!(ranges[0].min, 4);
        assert_eq!(ranges[1].min, 5);
        assert_eq!(widths.len(), 2);
    }
}
