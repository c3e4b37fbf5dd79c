use serde_json::Value;

use crate::config::PersonaMode;
use crate::models::UniversityRecord;

/// Data section used when the universities table comes back empty.
pub const NO_DATA_SENTINEL: &str = "No university data available.";

const PERSONA_COMMON: &str = "You are 'Dream University AI', an expert international education counsellor. \
Adopt the following personas based on the user query:\n\n\
🧠 PROFILE ANALYZER:\n\
- Analyze student profile (GPA, Budget, Exams) to identify strengths and weaknesses.\n\
- Be honest and practical. Highlight missing requirements (like IELTS/GRE).\n\n\
🧠 DECISION MAKER:\n\
- Recommend best countries based on career goals and budget.\n\
- Highlight risks (visa issues, low budget) and give confidence levels.\n\n\
🏫 UNIVERSITY SHORTLISTER:\n\
- Suggest universities from the list below that realistically match the profile.\n\
- Categorize them as SAFE, MODERATE, or AMBITIOUS.\n\
- STRICT RULE: Only recommend universities from the provided database list.\n";

const PERSONA_DOCUMENT_WRITING: &str = "\n✍️ SOP WRITER:\n\
- Help write compelling Statements of Purpose.\n\
- When the user asks for a document (SOP, essay, or email), write it freely; the \
database restriction applies to recommendations only.\n\
- Ensure the SOP aligns with the selected university and career goals.\n\
- Ask clarifying questions if details are missing before writing.\n";

/// Serialize records into the fixed one-line-per-university table.
///
/// Pure and total: output lines follow input order, missing fields render as
/// their literal placeholders, and an empty slice yields the sentinel line.
pub fn format_universities(records: &[UniversityRecord]) -> String {
    if records.is_empty() {
        return NO_DATA_SENTINEL.to_string();
    }

    records
        .iter()
        .map(|uni| {
            let name = uni.name.as_deref().unwrap_or("Unknown University");
            let country = uni.country.as_deref().unwrap_or("Unknown Country");
            let fees = fee_text(uni.tuition_fees_usd.as_ref());
            let tags: &[String] = uni.tags.as_deref().unwrap_or(&[]);
            format!("- {name} ({country}): Fees ${fees}, Tags: {tags:?}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn fee_text(fee: Option<&Value>) -> String {
    match fee {
        // The source table stores fees as numbers in some rows and strings in
        // others; render both bare, without JSON quoting.
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "N/A".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Assemble the full prompt: persona instruction, data table under its labeled
/// delimiter, then the user message verbatim. The whole table is always
/// embedded; there is no truncation or token budgeting.
pub fn build_prompt(persona: PersonaMode, records: &[UniversityRecord], user_message: &str) -> String {
    let instruction = match persona {
        PersonaMode::Strict => PERSONA_COMMON.to_string(),
        PersonaMode::DocumentWriting => format!("{PERSONA_COMMON}{PERSONA_DOCUMENT_WRITING}"),
    };

    format!(
        "{instruction}\n\
         --- UNIVERSITY DATABASE (For Recommendations Only) ---\n\
         {table}\n\
         ---------------------------\n\n\
         User Query: {user_message}",
        table = format_universities(records),
    )
}
