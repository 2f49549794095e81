//! Positional binding of GDELT 2.0 event rows.
//!
//! Archives carry no header, so fields are bound by position against the
//! published event codebook. Rows longer than the codebook keep their extra
//! fields as opaque overflow; shorter rows simply lack the trailing columns.

use crate::models::RawRecord;

pub const COLUMN_NAMES: [&str; 61] = [
    "GLOBALEVENTID",
    "SQLDATE",
    "MonthYear",
    "Year",
    "FractionDate",
    "Actor1Code",
    "Actor1Name",
    "Actor1CountryCode",
    "Actor1KnownGroupCode",
    "Actor1EthnicCode",
    "Actor1Religion1Code",
    "Actor1Religion2Code",
    "Actor1Type1Code",
    "Actor1Type2Code",
    "Actor1Type3Code",
    "Actor2Code",
    "Actor2Name",
    "Actor2CountryCode",
    "Actor2KnownGroupCode",
    "Actor2EthnicCode",
    "Actor2Religion1Code",
    "Actor2Religion2Code",
    "Actor2Type1Code",
    "Actor2Type2Code",
    "Actor2Type3Code",
    "IsRootEvent",
    "EventCode",
    "EventBaseCode",
    "EventRootCode",
    "QuadClass",
    "GoldsteinScale",
    "NumMentions",
    "NumSources",
    "NumArticles",
    "AvgTone",
    "Actor1Geo_Type",
    "Actor1Geo_FullName",
    "Actor1Geo_CountryCode",
    "Actor1Geo_ADM1Code",
    "Actor1Geo_ADM2Code",
    "Actor1Geo_Lat",
    "Actor1Geo_Long",
    "Actor1Geo_FeatureID",
    "Actor2Geo_Type",
    "Actor2Geo_FullName",
    "Actor2Geo_CountryCode",
    "Actor2Geo_ADM1Code",
    "Actor2Geo_ADM2Code",
    "Actor2Geo_Lat",
    "Actor2Geo_Long",
    "Actor2Geo_FeatureID",
    "ActionGeo_Type",
    "ActionGeo_FullName",
    "ActionGeo_CountryCode",
    "ActionGeo_ADM1Code",
    "ActionGeo_ADM2Code",
    "ActionGeo_Lat",
    "ActionGeo_Long",
    "ActionGeo_FeatureID",
    "DATEADDED",
    "SOURCEURL",
];

/// Columns the pipeline reads. Discriminants are positions in [`COLUMN_NAMES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    GlobalEventId = 0,
    SqlDate = 1,
    Actor1Name = 6,
    AvgTone = 34,
    SourceUrl = 60,
}

impl Column {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        COLUMN_NAMES[self.index()]
    }
}

/// A raw record viewed through the event schema.
#[derive(Debug, Clone, Copy)]
pub struct EventRow<'a> {
    fields: &'a [String],
}

impl<'a> EventRow<'a> {
    pub fn bind(record: &'a RawRecord) -> Self {
        Self { fields: record }
    }

    /// Trimmed value of a column; `None` when absent or blank.
    pub fn field(&self, column: Column) -> Option<&'a str> {
        self.at(column.index())
    }

    /// Lookup by codebook name, or by `EXTRA_n` for overflow fields.
    #[allow(dead_code)]
    pub fn get(&self, name: &str) -> Option<&'a str> {
        if let Some(index) = COLUMN_NAMES.iter().position(|c| *c == name) {
            return self.at(index);
        }
        let extra: usize = name.strip_prefix("EXTRA_")?.parse().ok()?;
        self.at(COLUMN_NAMES.len() + extra)
    }

    /// Fields beyond the codebook, untouched.
    pub fn overflow(&self) -> &'a [String] {
        self.fields.get(COLUMN_NAMES.len()..).unwrap_or(&[])
    }

    pub fn width(&self) -> usize {
        self.fields.len()
    }

    pub fn global_event_id(&self) -> Option<&'a str> {
        self.field(Column::GlobalEventId)
    }

    pub fn sql_date(&self) -> Option<&'a str> {
        self.field(Column::SqlDate)
    }

    pub fn actor1_name(&self) -> Option<&'a str> {
        self.field(Column::Actor1Name)
    }

    pub fn avg_tone(&self) -> Option<&'a str> {
        self.field(Column::AvgTone)
    }

    pub fn source_url(&self) -> Option<&'a str> {
        self.field(Column::SourceUrl)
    }

    fn at(&self, index: usize) -> Option<&'a str> {
        self.fields
            .get(index)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}
