//! Job posting import template
//!
//! Two header rows (section titles, then column titles). The selection
//! flow is laid out as a document-screening block followed by five
//! interview blocks. Document screening is always recorded; an interview
//! stage exists only when its "present" column holds the presence marker.

use crate::app::services::table_decoder::coders::Coder;
use crate::app::services::table_decoder::schema::{ColumnSchema, GroupLayout, NonEmptyRule};
use crate::app::services::vocabulary::VocabularyId;
use crate::constants::{JOB_CHANGE_CLAMP_ABOVE, JOB_CHANGE_CLAMP_TO};
use crate::Result;

/// Selection type of the document-screening stage
pub const DOCUMENT_SELECTION_TYPE: i64 = 1;

/// Selection types of the interview stages, in column order
pub const INTERVIEW_SELECTION_TYPES: [i64; 5] = [2, 3, 4, 5, 6];

pub const INTERVIEW_START: usize = 23;
pub const INTERVIEW_WIDTH: usize = 3;

pub fn schema() -> Result<ColumnSchema> {
    ColumnSchema::builder("job-posting")
        .header_rows(2)
        .column(0, "company_name", Coder::Text)
        .column(1, "title", Coder::Text)
        .column(2, "occupations", Coder::multi_code(VocabularyId::Occupation))
        .column(3, "industries", Coder::multi_code(VocabularyId::Industry))
        .column(4, "employment_type", Coder::code(VocabularyId::EmploymentType))
        .column(5, "work_prefectures", Coder::multi_code(VocabularyId::Prefecture))
        .column(6, "salary_min", Coder::Int)
        .column(7, "salary_max", Coder::Int)
        .column(8, "description", Coder::Text)
        .column(9, "requirements.experience", Coder::code(VocabularyId::WorkExperience))
        .column(10, "requirements.licenses", Coder::multi_code(VocabularyId::License))
        .column(11, "requirements.age_min", Coder::Int)
        .column(12, "requirements.age_max", Coder::Int)
        .column(
            13,
            "requirements.max_job_changes",
            Coder::clamped(JOB_CHANGE_CLAMP_ABOVE, JOB_CHANGE_CLAMP_TO),
        )
        .column(14, "requirements.education", Coder::code(VocabularyId::Education))
        .group(
            GroupLayout::new("required_experience", "requirements.experiences", 15, 2, 3)
                .field(0, "occupation", Coder::code(VocabularyId::Occupation))
                .field(1, "years", Coder::Int),
        )
        .group(
            GroupLayout::new("selection_document", "selection_flows", 21, 2, 1)
                .field(0, "method", Coder::Text)
                .field(1, "notes", Coder::Text)
                .rule(NonEmptyRule::Always)
                .discriminator("selection_type", vec![DOCUMENT_SELECTION_TYPE]),
        )
        .group(
            GroupLayout::new(
                "selection_interview",
                "selection_flows",
                INTERVIEW_START,
                INTERVIEW_WIDTH,
                INTERVIEW_SELECTION_TYPES.len(),
            )
            .field(0, "present", Coder::presence())
            .field(1, "method", Coder::Text)
            .field(2, "notes", Coder::Text)
            .rule(NonEmptyRule::presence("present"))
            .discriminator("selection_type", INTERVIEW_SELECTION_TYPES.to_vec()),
        )
        .column(38, "published_at", Coder::timestamp())
        .column(39, "remarks", Coder::Text)
        .build()
}
