//! Company import template: one header row, three billing contacts

use crate::app::services::table_decoder::coders::Coder;
use crate::app::services::table_decoder::schema::{ColumnSchema, GroupLayout};
use crate::app::services::vocabulary::VocabularyId;
use crate::Result;

/// First column of the billing-contact block
pub const BILLING_START: usize = 15;
pub const BILLING_WIDTH: usize = 8;
pub const BILLING_OCCURRENCES: usize = 3;

pub fn schema() -> Result<ColumnSchema> {
    ColumnSchema::builder("company")
        .header_rows(1)
        .column(0, "name", Coder::Text)
        .column(1, "name_kana", Coder::Text)
        .column(2, "corporate_number", Coder::Text)
        .column(3, "postal_code", Coder::Text)
        .column(4, "prefecture", Coder::code(VocabularyId::Prefecture))
        .column(5, "address", Coder::Text)
        .column(6, "phone", Coder::Text)
        .column(7, "url", Coder::Text)
        .column(8, "industries", Coder::multi_code(VocabularyId::Industry))
        .column(9, "employee_count", Coder::Int)
        .column(10, "established_year", Coder::Int)
        .column(11, "capital", Coder::Int)
        .column(12, "representative", Coder::Text)
        .column(13, "description", Coder::Text)
        .column(14, "registered_at", Coder::timestamp())
        .group(
            GroupLayout::new(
                "billing_contact",
                "billing_contacts",
                BILLING_START,
                BILLING_WIDTH,
                BILLING_OCCURRENCES,
            )
            .field(0, "department", Coder::Text)
            .field(1, "contact_name", Coder::Text)
            .field(2, "contact_kana", Coder::Text)
            .field(3, "email", Coder::Text)
            .field(4, "phone", Coder::Text)
            .field(5, "postal_code", Coder::Text)
            .field(6, "prefecture", Coder::code(VocabularyId::Prefecture))
            .field(7, "address", Coder::Text),
        )
        .column(39, "memo", Coder::Text)
        .build()
}
