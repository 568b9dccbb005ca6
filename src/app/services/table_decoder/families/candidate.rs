//! Candidate import template
//!
//! Work-history blocks each carry three occupation/years pairs, which are
//! assembled as a micro-group inside the block.

use crate::app::services::table_decoder::coders::Coder;
use crate::app::services::table_decoder::schema::{ColumnSchema, GroupLayout, SubGroupLayout};
use crate::app::services::vocabulary::VocabularyId;
use crate::constants::{JOB_CHANGE_CLAMP_ABOVE, JOB_CHANGE_CLAMP_TO};
use crate::Result;

pub const WORK_HISTORY_START: usize = 20;
pub const WORK_HISTORY_WIDTH: usize = 12;
pub const DEPARTMENT_START: usize = 56;
pub const LANGUAGE_START: usize = 65;

pub fn schema() -> Result<ColumnSchema> {
    ColumnSchema::builder("candidate")
        .header_rows(1)
        .column(0, "name", Coder::Text)
        .column(1, "name_kana", Coder::Text)
        .column(2, "gender", Coder::code(VocabularyId::Gender))
        .column(3, "birth_date", Coder::date())
        .column(4, "prefecture", Coder::code(VocabularyId::Prefecture))
        .column(5, "address", Coder::Text)
        .column(6, "phone", Coder::Text)
        .column(7, "email", Coder::Text)
        .column(8, "education", Coder::code(VocabularyId::Education))
        .column(9, "school_name", Coder::Text)
        .column(10, "experience", Coder::code(VocabularyId::WorkExperience))
        .column(
            11,
            "job_change_count",
            Coder::clamped(JOB_CHANGE_CLAMP_ABOVE, JOB_CHANGE_CLAMP_TO),
        )
        .column(12, "current_income", Coder::Int)
        .column(13, "desired_income", Coder::Int)
        .range(14, 3, "desired_prefectures", Coder::code(VocabularyId::Prefecture))
        .column(17, "desired_occupations", Coder::multi_code(VocabularyId::Occupation))
        .column(18, "desired_industries", Coder::multi_code(VocabularyId::Industry))
        .column(19, "licenses", Coder::multi_code(VocabularyId::License))
        .group(
            GroupLayout::new("work_history", "work_histories", WORK_HISTORY_START, WORK_HISTORY_WIDTH, 3)
                .field(0, "company_name", Coder::Text)
                .field(1, "industry", Coder::code(VocabularyId::Industry))
                .field(2, "employment_type", Coder::code(VocabularyId::EmploymentType))
                .field(3, "started_on", Coder::Text)
                .field(4, "ended_on", Coder::Text)
                .field(5, "description", Coder::Text)
                .subgroup(
                    SubGroupLayout::new("occupations", 6, 2, 3)
                        .field(0, "occupation", Coder::code(VocabularyId::Occupation))
                        .field(1, "years", Coder::Int),
                ),
        )
        .group(
            GroupLayout::new("department", "departments", DEPARTMENT_START, 3, 3)
                .field(0, "name", Coder::Text)
                .field(1, "role", Coder::Text)
                .field(2, "team_size", Coder::Int),
        )
        .group(
            GroupLayout::new("language", "languages", LANGUAGE_START, 2, 3)
                .field(0, "language", Coder::code(VocabularyId::Language))
                .field(1, "level", Coder::code(VocabularyId::LanguageLevel)),
        )
        .column(71, "registered_at", Coder::timestamp())
        .column(72, "memo", Coder::Text)
        .build()
}
