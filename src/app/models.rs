//! Data models for decoded recruiting tables
//!
//! This module contains the typed aggregates produced by the table decoder,
//! one per table family, together with their nested sub-records. Every
//! field is optional or a collection: spreadsheet rows routinely leave
//! columns empty, and an empty cell must stay distinguishable from a zero.

use crate::app::services::table_decoder::families;
use crate::app::services::table_decoder::{ColumnSchema, DecodedRecord};
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Table Families
// =============================================================================

/// The shipped spreadsheet layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableFamily {
    Company,
    JobPosting,
    Candidate,
    SendTarget,
}

impl TableFamily {
    pub const ALL: &'static [TableFamily] = &[
        TableFamily::Company,
        TableFamily::JobPosting,
        TableFamily::Candidate,
        TableFamily::SendTarget,
    ];

    /// Stable kebab-case name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            TableFamily::Company => "company",
            TableFamily::JobPosting => "job-posting",
            TableFamily::Candidate => "candidate",
            TableFamily::SendTarget => "send-target",
        }
    }
}

impl fmt::Display for TableFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TableFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        TableFamily::ALL
            .iter()
            .copied()
            .find(|family| family.name() == wanted)
            .ok_or_else(|| Error::unknown_table_family(s))
    }
}

/// A root entity decoded from one spreadsheet row
pub trait Aggregate: Serialize + DeserializeOwned + Send + 'static {
    const FAMILY: TableFamily;

    /// Shipped layout of this aggregate's table
    fn schema() -> Result<ColumnSchema> {
        families::schema_for(Self::FAMILY)
    }

    /// Bind an untyped record to this aggregate
    fn from_record(record: &DecodedRecord) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_value(record.to_json())
    }
}

// =============================================================================
// Company
// =============================================================================

/// Client company with up to three billing contacts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Company {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_kana: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corporate_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// Prefecture code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefecture: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Industry codes
    pub industries: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub established_year: Option<i64>,
    /// Capital in yen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representative: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<NaiveDateTime>,
    pub billing_contacts: Vec<BillingContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl Aggregate for Company {
    const FAMILY: TableFamily = TableFamily::Company;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingContact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_kana: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefecture: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

// =============================================================================
// Job Posting
// =============================================================================

/// Job posting with requirements and selection flow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPosting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub occupations: Vec<i32>,
    pub industries: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<i32>,
    pub work_prefectures: Vec<i32>,
    /// Annual salary bounds in yen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub requirements: JobRequirements,
    /// Document screening first, then interview stages in order
    pub selection_flows: Vec<SelectionFlow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl Aggregate for JobPosting {
    const FAMILY: TableFamily = TableFamily::JobPosting;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRequirements {
    /// Work-experience code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<i32>,
    pub licenses: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_max: Option<i64>,
    /// Upper bound on job changes; 5 means "5 or more"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_job_changes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<i32>,
    pub experiences: Vec<RequiredExperience>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequiredExperience {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years: Option<i64>,
}

/// One stage of a job's selection flow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionFlow {
    /// 1 for document screening, 2.. for interview rounds
    pub selection_type: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub present: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// =============================================================================
// Candidate
// =============================================================================

/// Job seeker with work history, departments and languages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Candidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_kana: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefecture: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<i32>,
    /// 5 means "5 or more"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_change_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_income: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_income: Option<i64>,
    pub desired_prefectures: Vec<i32>,
    pub desired_occupations: Vec<i32>,
    pub desired_industries: Vec<i32>,
    pub licenses: Vec<i32>,
    pub work_histories: Vec<WorkHistory>,
    pub departments: Vec<DepartmentExperience>,
    pub languages: Vec<LanguageSkill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl Aggregate for Candidate {
    const FAMILY: TableFamily = TableFamily::Candidate;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkHistory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<i32>,
    /// Free-form period text as entered ("2019/04", "2019年4月")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub occupations: Vec<OccupationExperience>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OccupationExperience {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepartmentExperience {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_size: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageSkill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
}

// =============================================================================
// Send-Target Job Posting
// =============================================================================

/// A job posting sent to a candidate pool, with its targeting criteria
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendTargetJobPosting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_posting_code: Option<String>,
    pub occupations: Vec<i32>,
    pub work_prefectures: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_age_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_age_max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_experience: Option<i32>,
    pub target_licenses: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl Aggregate for SendTargetJobPosting {
    const FAMILY: TableFamily = TableFamily::SendTarget;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::table_decoder::CellValue;

    #[test]
    fn test_table_family_from_str() {
        assert_eq!("company".parse::<TableFamily>().unwrap(), TableFamily::Company);
        assert_eq!("job_posting".parse::<TableFamily>().unwrap(), TableFamily::JobPosting);
        assert_eq!("Send-Target".parse::<TableFamily>().unwrap(), TableFamily::SendTarget);
        assert!(matches!(
            "invoice".parse::<TableFamily>(),
            Err(Error::UnknownTableFamily { .. })
        ));
    }

    #[test]
    fn test_empty_record_binds_to_default() {
        let candidate = Candidate::from_record(&DecodedRecord::new()).unwrap();
        assert_eq!(candidate, Candidate::default());
    }

    #[test]
    fn test_nested_record_binding() {
        let mut stage = DecodedRecord::new();
        stage.set("selection_type", CellValue::Int(1));
        stage.set("method", CellValue::Text("書類選考".into()));

        let mut record = DecodedRecord::new();
        record.set("title", CellValue::Text("営業".into()));
        record.set("requirements.max_job_changes", CellValue::Int(5));
        record.set("occupations", CellValue::List(vec![CellValue::Code(8)]));
        record.push("selection_flows", stage);

        let posting = JobPosting::from_record(&record).unwrap();
        assert_eq!(posting.title.as_deref(), Some("営業"));
        assert_eq!(posting.requirements.max_job_changes, Some(5));
        assert_eq!(posting.occupations, vec![8]);
        assert_eq!(posting.selection_flows.len(), 1);
        assert_eq!(posting.selection_flows[0].selection_type, 1);
        assert_eq!(posting.selection_flows[0].method.as_deref(), Some("書類選考"));
    }

    #[test]
    fn test_type_mismatch_fails_binding() {
        let mut record = DecodedRecord::new();
        record.set("prefecture", CellValue::Text("東京都".into()));
        assert!(Company::from_record(&record).is_err());
    }
}
