//! Team-season rows and the tables that hold them.

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use super::schema::StatSchema;
use crate::cli::types::{Season, TeamId};
use crate::error::{Result, StatsError};

/// Columns every flat row carries ahead of, and after, the roster and stat columns.
pub const RESERVED_COLUMNS: &[&str] = &["team_id", "season", "link", "clinch_indicator"];

/// Playoff qualification state of a team that appears in the standings.
///
/// A team missing from the standings has no status at all (`None` on the
/// record), which is different from [`ClinchStatus::NotClinched`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClinchStatus {
    /// The standings entry carried a clinch event.
    Clinched,
    /// Present in the standings, no clinch event recorded.
    NotClinched,
}

impl ClinchStatus {
    pub fn indicator(&self) -> u8 {
        match self {
            ClinchStatus::Clinched => 1,
            ClinchStatus::NotClinched => 0,
        }
    }
}

/// One row of the output table: a team in a season.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSeasonRecord {
    pub team_id: TeamId,
    pub season: Season,
    /// API path of this team, used to build its stats request.
    pub link: String,
    /// Roster fields that survived the descriptive-column drop (abbreviation, active, ...),
    /// in document order.
    pub attributes: Map<String, Value>,
    pub stats: BTreeMap<String, f64>,
    pub clinch_indicator: Option<ClinchStatus>,
}

impl TeamSeasonRecord {
    pub fn new(team_id: TeamId, season: Season, link: impl Into<String>) -> Self {
        Self {
            team_id,
            season,
            link: link.into(),
            attributes: Map::new(),
            stats: BTreeMap::new(),
            clinch_indicator: None,
        }
    }

    pub fn stat(&self, name: &str) -> Option<f64> {
        self.stats.get(name).copied()
    }

    /// Flat JSON object for this row: `team_id`, `season`, `link`, roster
    /// attributes, stat columns in schema order, then `clinch_indicator`.
    ///
    /// An attribute named like a reserved or stat column is left out.
    pub fn to_flat_json(&self, schema: &StatSchema) -> Value {
        let mut obj = Map::new();
        obj.insert("team_id".into(), Value::from(self.team_id.as_u32()));
        obj.insert("season".into(), Value::from(self.season.token()));
        obj.insert("link".into(), Value::from(self.link.clone()));
        for (key, value) in &self.attributes {
            if RESERVED_COLUMNS.contains(&key.as_str()) || schema.contains(key) {
                continue;
            }
            obj.insert(key.clone(), value.clone());
        }
        for name in schema.names() {
            let value = self
                .stats
                .get(name)
                .and_then(|v| serde_json::Number::from_f64(*v))
                .map(Value::Number)
                .unwrap_or(Value::Null);
            obj.insert(name.to_string(), value);
        }
        obj.insert(
            "clinch_indicator".into(),
            self.clinch_indicator
                .map(|c| Value::from(c.indicator()))
                .unwrap_or(Value::Null),
        );
        Value::Object(obj)
    }
}

/// All rows of one season, addressable by team id.
///
/// Rows keep the roster's order; `index` maps each team id to its row so
/// that every write is an update by key.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSlice {
    season: Season,
    records: Vec<TeamSeasonRecord>,
    index: HashMap<TeamId, usize>,
}

impl SeasonSlice {
    pub fn new(season: Season) -> Self {
        Self {
            season,
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn season(&self) -> Season {
        self.season
    }

    /// Add a row. A second row for the same team is rejected.
    pub fn insert(&mut self, record: TeamSeasonRecord) -> Result<()> {
        if record.season != self.season {
            return Err(StatsError::shape(
                "teams",
                format!(
                    "record for team {} belongs to season {}, not {}",
                    record.team_id, record.season, self.season
                ),
            ));
        }
        if self.index.contains_key(&record.team_id) {
            return Err(StatsError::shape(
                "teams",
                format!("duplicate team id {} in season {}", record.team_id, self.season),
            ));
        }
        self.index.insert(record.team_id, self.records.len());
        self.records.push(record);
        Ok(())
    }

    pub fn get(&self, team_id: TeamId) -> Option<&TeamSeasonRecord> {
        self.index.get(&team_id).map(|&i| &self.records[i])
    }

    pub fn get_mut(&mut self, team_id: TeamId) -> Option<&mut TeamSeasonRecord> {
        self.index.get(&team_id).map(|&i| &mut self.records[i])
    }

    pub fn team_ids(&self) -> Vec<TeamId> {
        self.records.iter().map(|r| r.team_id).collect()
    }

    pub fn records(&self) -> &[TeamSeasonRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Give every row a zero-valued column for each schema field it lacks.
    /// Existing values are left alone.
    pub fn widen(&mut self, schema: &StatSchema) {
        for record in &mut self.records {
            for name in schema.names() {
                record.stats.entry(name.to_string()).or_insert(0.0);
            }
        }
    }

    /// True when every row carries exactly the schema's columns.
    pub fn conforms_to(&self, schema: &StatSchema) -> bool {
        self.records.iter().all(|r| {
            r.stats.len() == schema.len() && schema.names().all(|n| r.stats.contains_key(n))
        })
    }
}

/// The assembled multi-season table, keyed by (season, team id).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamStatsTable {
    schema: StatSchema,
    seasons: Vec<SeasonSlice>,
}

impl TeamStatsTable {
    pub fn new(schema: StatSchema) -> Self {
        Self {
            schema,
            seasons: Vec::new(),
        }
    }

    pub fn schema(&self) -> &StatSchema {
        &self.schema
    }

    /// Add a finished season. Seasons are unique within the table.
    pub fn append(&mut self, slice: SeasonSlice) -> Result<()> {
        if self.seasons.iter().any(|s| s.season == slice.season) {
            return Err(StatsError::shape(
                "seasons",
                format!("season {} already assembled", slice.season),
            ));
        }
        self.seasons.push(slice);
        Ok(())
    }

    pub fn season(&self, season: Season) -> Option<&SeasonSlice> {
        self.seasons.iter().find(|s| s.season == season)
    }

    pub fn seasons(&self) -> impl Iterator<Item = Season> + '_ {
        self.seasons.iter().map(|s| s.season)
    }

    pub fn get(&self, season: Season, team_id: TeamId) -> Option<&TeamSeasonRecord> {
        self.season(season)?.get(team_id)
    }

    pub fn rows(&self) -> impl Iterator<Item = &TeamSeasonRecord> {
        self.seasons.iter().flat_map(|s| s.records.iter())
    }

    pub fn len(&self) -> usize {
        self.seasons.iter().map(SeasonSlice::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for TeamStatsTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for row in self.rows() {
            seq.serialize_element(&row.to_flat_json(&self.schema))?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: u32, season: Season) -> TeamSeasonRecord {
        TeamSeasonRecord::new(TeamId::new(id), season, format!("/api/v1/teams/{id}"))
    }

    #[test]
    fn test_slice_rejects_duplicate_team() {
        let season = Season::new(2015);
        let mut slice = SeasonSlice::new(season);
        slice.insert(record(1, season)).unwrap();
        assert!(matches!(
            slice.insert(record(1, season)),
            Err(StatsError::ShapeMismatch { .. })
        ));
        assert_eq!(slice.len(), 1);
    }

    #[test]
    fn test_slice_rejects_foreign_season() {
        let mut slice = SeasonSlice::new(Season::new(2015));
        assert!(slice.insert(record(1, Season::new(2016))).is_err());
    }

    #[test]
    fn test_slice_lookup_by_key_not_position() {
        let season = Season::new(2015);
        let mut slice = SeasonSlice::new(season);
        for id in [30, 4, 17] {
            slice.insert(record(id, season)).unwrap();
        }
        slice.get_mut(TeamId::new(4)).unwrap().link = "/changed".into();

        assert_eq!(slice.records()[1].link, "/changed");
        assert_eq!(slice.team_ids(), vec![TeamId::new(30), TeamId::new(4), TeamId::new(17)]);
        assert!(slice.get(TeamId::new(99)).is_none());
    }

    #[test]
    fn test_widen_keeps_existing_values() {
        let season = Season::new(2015);
        let mut slice = SeasonSlice::new(season);
        let mut r = record(1, season);
        r.stats.insert("wins".into(), 41.0);
        slice.insert(r).unwrap();
        slice.insert(record(2, season)).unwrap();

        let schema = StatSchema::from_names(["wins", "goals"]);
        slice.widen(&schema);

        assert!(slice.conforms_to(&schema));
        assert_eq!(slice.get(TeamId::new(1)).unwrap().stat("wins"), Some(41.0));
        assert_eq!(slice.get(TeamId::new(2)).unwrap().stat("wins"), Some(0.0));
        assert_eq!(slice.get(TeamId::new(2)).unwrap().stat("goals"), Some(0.0));
    }

    #[test]
    fn test_table_rejects_repeated_season() {
        let mut table = TeamStatsTable::new(StatSchema::default());
        table.append(SeasonSlice::new(Season::new(2015))).unwrap();
        assert!(table.append(SeasonSlice::new(Season::new(2015))).is_err());
    }

    #[test]
    fn test_table_serializes_flat_rows() {
        let season = Season::new(2015);
        let schema = StatSchema::from_names(["wins", "goals"]);
        let mut slice = SeasonSlice::new(season);
        let mut r = record(7, season);
        r.attributes.insert("abbreviation".into(), json!("BUF"));
        r.stats.insert("wins".into(), 41.0);
        r.stats.insert("goals".into(), 210.0);
        r.clinch_indicator = Some(ClinchStatus::Clinched);
        slice.insert(r).unwrap();
        slice.insert(record(8, season)).unwrap();
        slice.widen(&schema);

        let mut table = TeamStatsTable::new(schema);
        table.append(slice).unwrap();

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(
            json,
            json!([
                {
                    "team_id": 7,
                    "season": "20152016",
                    "link": "/api/v1/teams/7",
                    "abbreviation": "BUF",
                    "wins": 41.0,
                    "goals": 210.0,
                    "clinch_indicator": 1
                },
                {
                    "team_id": 8,
                    "season": "20152016",
                    "link": "/api/v1/teams/8",
                    "wins": 0.0,
                    "goals": 0.0,
                    "clinch_indicator": null
                }
            ])
        );
    }

    #[test]
    fn test_flat_row_column_order() {
        let season = Season::new(2015);
        let mut r = record(7, season);
        r.attributes.insert("abbreviation".into(), json!("BUF"));
        r.attributes.insert("active".into(), json!(true));
        r.stats.insert("wins".into(), 41.0);
        r.stats.insert("goals".into(), 210.0);

        let schema = StatSchema::from_names(["wins", "goals"]);
        let text = serde_json::to_string(&r.to_flat_json(&schema)).unwrap();
        assert_eq!(
            text,
            concat!(
                r#"{"team_id":7,"season":"20152016","link":"/api/v1/teams/7","#,
                r#""abbreviation":"BUF","active":true,"wins":41.0,"goals":210.0,"#,
                r#""clinch_indicator":null}"#
            )
        );
    }

    #[test]
    fn test_attributes_never_shadow_columns() {
        let season = Season::new(2015);
        let mut r = record(7, season);
        r.attributes.insert("season".into(), json!("2015"));
        r.attributes.insert("link".into(), json!("/elsewhere"));
        r.attributes.insert("wins".into(), json!("many"));
        r.stats.insert("wins".into(), 41.0);

        let row = r.to_flat_json(&StatSchema::from_names(["wins"]));
        assert_eq!(row["season"], json!("20152016"));
        assert_eq!(row["link"], json!("/api/v1/teams/7"));
        assert_eq!(row["wins"], json!(41.0));
    }

    #[test]
    fn test_clinch_indicator_values() {
        assert_eq!(ClinchStatus::Clinched.indicator(), 1);
        assert_eq!(ClinchStatus::NotClinched.indicator(), 0);
    }
}
