//! Send-target job posting template: flat, no repeat-groups

use crate::app::services::table_decoder::coders::Coder;
use crate::app::services::table_decoder::schema::ColumnSchema;
use crate::app::services::vocabulary::VocabularyId;
use crate::Result;

pub fn schema() -> Result<ColumnSchema> {
    ColumnSchema::builder("send-target")
        .header_rows(1)
        .column(0, "company_name", Coder::Text)
        .column(1, "job_title", Coder::Text)
        .column(2, "job_posting_code", Coder::Text)
        .column(3, "occupations", Coder::multi_code(VocabularyId::Occupation))
        .column(4, "work_prefectures", Coder::multi_code(VocabularyId::Prefecture))
        .column(5, "salary_min", Coder::Int)
        .column(6, "salary_max", Coder::Int)
        .column(7, "employment_type", Coder::code(VocabularyId::EmploymentType))
        .column(8, "target_age_min", Coder::Int)
        .column(9, "target_age_max", Coder::Int)
        .column(10, "target_experience", Coder::code(VocabularyId::WorkExperience))
        .column(11, "target_licenses", Coder::multi_code(VocabularyId::License))
        .column(12, "sent_at", Coder::timestamp())
        .column(13, "remarks", Coder::Text)
        .build()
}
