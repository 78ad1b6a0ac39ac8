use super::RulesError;
use crate::scoring::domain::{ApprovalType, Zone};
use crate::scoring::normalizer::{is_state_code, normalize_code};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

const TABLE: &str = "jurisdiction";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JurisdictionRecord {
    pub code: String,
    pub name: String,
    pub score: u8,
    pub zone: Zone,
    pub approval_type: ApprovalType,
    pub gating: bool,
    pub timeline_days: u32,
}

/// State-level school registration difficulty, keyed by two-letter code.
#[derive(Debug, Clone)]
pub struct JurisdictionTable {
    records: BTreeMap<String, JurisdictionRecord>,
}

impl JurisdictionTable {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RulesError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for row in csv_reader.deserialize::<JurisdictionRow>() {
            let row = row.map_err(|source| RulesError::Csv {
                table: TABLE,
                source,
            })?;
            records.push(row.into_record());
        }

        Self::from_records(records)
    }

    pub fn from_records(records: Vec<JurisdictionRecord>) -> Result<Self, RulesError> {
        if records.is_empty() {
            return Err(RulesError::Empty { table: TABLE });
        }

        let mut table = BTreeMap::new();
        for (index, record) in records.into_iter().enumerate() {
            validate(&record, index + 1)?;
            if table.contains_key(&record.code) {
                return Err(RulesError::Duplicate {
                    table: TABLE,
                    key: record.code,
                });
            }
            table.insert(record.code.clone(), record);
        }

        Ok(Self { records: table })
    }

    /// Case- and whitespace-insensitive lookup.
    pub fn lookup(&self, code: &str) -> Option<&JurisdictionRecord> {
        self.records.get(&normalize_code(code))
    }

    /// Records in code order.
    pub fn iter(&self) -> impl Iterator<Item = &JurisdictionRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn validate(record: &JurisdictionRecord, row: usize) -> Result<(), RulesError> {
    let invalid = |reason: String| RulesError::InvalidRow {
        table: TABLE,
        row,
        reason,
    };

    if !is_state_code(&record.code) {
        return Err(invalid(format!(
            "'{}' is not a two-letter code",
            record.code
        )));
    }
    if record.score > 100 {
        return Err(invalid(format!(
            "{} score {} exceeds 100",
            record.code, record.score
        )));
    }

    let derived = Zone::for_jurisdiction(record.score);
    if record.zone != derived {
        return Err(RulesError::ZoneMismatch {
            code: record.code.clone(),
            score: record.score,
            stored: record.zone,
            derived,
        });
    }

    match record.approval_type {
        ApprovalType::Unknown => Err(invalid(format!(
            "{} cannot store approval type UNKNOWN",
            record.code
        ))),
        ApprovalType::NotRequired if record.gating => Err(invalid(format!(
            "{} requires no approval but is marked gating",
            record.code
        ))),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize)]
struct JurisdictionRow {
    code: String,
    name: String,
    score: u8,
    zone: Zone,
    approval_type: ApprovalType,
    gating: bool,
    timeline_days: u32,
}

impl JurisdictionRow {
    fn into_record(self) -> JurisdictionRecord {
        JurisdictionRecord {
            code: normalize_code(&self.code),
            name: self.name,
            score: self.score,
            zone: self.zone,
            approval_type: self.approval_type,
            gating: self.gating,
            timeline_days: self.timeline_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "code,name,score,zone,approval_type,gating,timeline_days\n";

    fn table(rows: &str) -> Result<JurisdictionTable, RulesError> {
        JurisdictionTable::from_reader(format!("{HEADER}{rows}").as_bytes())
    }

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let table = table("tx,Texas,95,GREEN,NONE,false,7\n").expect("loads");
        let record = table.lookup(" Tx ").expect("record found");
        assert_eq!(record.code, "TX");
        assert_eq!(record.approval_type, ApprovalType::NotRequired);
    }

    #[test]
    fn stored_zone_must_match_score() {
        let error = table("MA,Massachusetts,40,YELLOW,APPROVAL,true,180\n")
            .expect_err("zone mismatch detected");
        match error {
            RulesError::ZoneMismatch {
                code,
                stored,
                derived,
                ..
            } => {
                assert_eq!(code, "MA");
                assert_eq!(stored, Zone::Yellow);
                assert_eq!(derived, Zone::Red);
            }
            other => panic!("expected zone mismatch, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_codes_are_rejected() {
        let error = table(
            "TX,Texas,95,GREEN,NONE,false,7\n\
             tx,Texas again,90,GREEN,NONE,false,7\n",
        )
        .expect_err("duplicate code");
        assert!(matches!(error, RulesError::Duplicate { .. }));
    }

    #[test]
    fn approval_free_states_cannot_gate() {
        let error =
            table("TX,Texas,95,GREEN,NONE,true,7\n").expect_err("gating without approval");
        assert!(matches!(error, RulesError::InvalidRow { row: 1, .. }));
    }

    #[test]
    fn malformed_codes_are_rejected() {
        let error = table("TEX,Texas,95,GREEN,NONE,false,7\n").expect_err("bad code");
        assert!(matches!(error, RulesError::InvalidRow { .. }));
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(matches!(table(""), Err(RulesError::Empty { .. })));
    }
}
