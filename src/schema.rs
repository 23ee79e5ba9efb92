//! Fixed candidate-sheet layouts: which input headers are recognized and
//! what the output columns are called, per hiring track.

use clap::ValueEnum;

/// Input header that carries the candidate's unique identifier.
pub const CANDIDATE_ID: &str = "Candidate ID";
/// Input header that carries the export timestamp used for dedupe.
pub const CREATED_DATE: &str = "CREATED_DATE";
/// Input header that carries the application date, regardless of track.
pub const APPLICATION_DATE_SOURCE: &str = "Tags";
pub const STATUS_COLUMN: &str = "Status";
pub const COMMENTS_COLUMN: &str = "Comments";
/// Value written into a synthesized `Status` column.
pub const STATUS_DEFAULT: &str = "Active";
/// Output header receiving the serialized `CREATED_DATE`.
pub const UPDATION_DATE: &str = "Updation Date";

/// Hiring track a sheet belongs to. Selects the column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CandidateFormat {
    /// Lateral hires: salary, notice period, and relevant-experience columns.
    Experience,
    /// Campus hires: institute column, no salary columns.
    Fresher,
}

/// One track's column layout: `(input header, output header)` pairs in
/// mapping order, plus an optional forced ordering of the output columns.
pub struct FormatLayout {
    pub mapping: &'static [(&'static str, &'static str)],
    pub output_order: Option<&'static [&'static str]>,
}

// "Applicaiton Date" is misspelled on purpose: the downstream experience
// tracker keys on that exact header.
static EXPERIENCE_LAYOUT: FormatLayout = FormatLayout {
    mapping: &[
        ("Tags", "Applicaiton Date"),
        ("CREATED_DATE", "Updation Date"),
        ("Candidate ID", "Candidate ID"),
        ("Name", "Candidate Name"),
        ("E-mail", "Email"),
        ("Mobile No", "Contact No."),
        ("Location", "Location"),
        ("How Did You Hear About This Job Opportunity?", "Source"),
        ("Total Experience (in Years)", "Total Experience"),
        ("Relevant Experience (in Years)", "Relevant Experience"),
        (
            "What is your current annual salary? (Please specify in Lacs such as 4,00,000)",
            "Current Salary (Annual)",
        ),
        (
            "What is your expected annual salary? (Please specify in Lacs such as 6,00,000)",
            "Expected Salary (Annual)",
        ),
        ("Notice Period (in days)", "Notice Period (in days)"),
        ("Status", "Status"),
        ("Comments", "Comments"),
    ],
    output_order: None,
};

// "Name of Instiute" is likewise what the fresher tracker expects.
static FRESHER_LAYOUT: FormatLayout = FormatLayout {
    mapping: &[
        ("Candidate ID", "Candidate ID"),
        ("Name", "Candidate Name"),
        ("E-mail", "Email"),
        ("Mobile No", "Contact No."),
        ("Location", "Location"),
        ("How Did You Hear About This Job Opportunity?", "Source"),
        ("Name of the Institute", "Name of Instiute"),
        ("Total Experience (in Years)", "Experience"),
        ("Tags", "Application Date"),
        ("CREATED_DATE", "Updation Date"),
        ("Status", "Status"),
        ("Comments", "Comments"),
    ],
    output_order: Some(&[
        "Application Date",
        "Updation Date",
        "Candidate ID",
        "Candidate Name",
        "Email",
        "Contact No.",
        "Location",
        "Source",
        "Name of Instiute",
        "Experience",
        "Status",
        "Comments",
    ]),
};

impl CandidateFormat {
    pub fn layout(self) -> &'static FormatLayout {
        match self {
            CandidateFormat::Experience => &EXPERIENCE_LAYOUT,
            CandidateFormat::Fresher => &FRESHER_LAYOUT,
        }
    }

    /// Output header the `Tags` column maps to. The two tracks spell it
    /// differently.
    pub fn application_date_output(self) -> &'static str {
        match self {
            CandidateFormat::Experience => "Applicaiton Date",
            CandidateFormat::Fresher => "Application Date",
        }
    }
}
