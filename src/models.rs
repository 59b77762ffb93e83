use std::fmt;

/// Column order shared by the parser and the CSV serializer.
pub const FIELD_NAMES: [&str; 8] = [
    "Year",
    "State",
    "Tax_Credit_Type",
    "Sector",
    "Claimed_Amount",
    "Claims_Count",
    "Income_Bracket",
    "Source",
];

pub const DELIMITER: u8 = b',';

/// One tax-credit observation: a single year/state/credit/sector/bracket row.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxCreditRecord {
    pub year: i32,
    pub state: String,
    pub credit_type: String,
    pub sector: String,
    pub claimed_amount: f64,
    pub claims_count: i64,
    pub income_bracket: String,
    pub source: String,
}

impl TaxCreditRecord {
    /// Field values in `FIELD_NAMES` order, ready for serialization.
    pub fn to_fields(&self) -> [String; 8] {
        [
            self.year.to_string(),
            self.state.clone(),
            self.credit_type.clone(),
            self.sector.clone(),
            self.claimed_amount.to_string(),
            self.claims_count.to_string(),
            self.income_bracket.clone(),
            self.source.clone(),
        ]
    }
}

/// The five axes a record can be filtered or grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum Dimension {
    Year,
    State,
    CreditType,
    Sector,
    IncomeBracket,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Year,
        Dimension::State,
        Dimension::CreditType,
        Dimension::Sector,
        Dimension::IncomeBracket,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Year => "Year",
            Self::State => "State",
            Self::CreditType => "Credit Type",
            Self::Sector => "Sector",
            Self::IncomeBracket => "Income Bracket",
        }
    }

    /// The record's value on this axis, as text.
    pub fn value_of(&self, record: &TaxCreditRecord) -> String {
        match self {
            Self::Year => record.year.to_string(),
            Self::State => record.state.clone(),
            Self::CreditType => record.credit_type.clone(),
            Self::Sector => record.sector.clone(),
            Self::IncomeBracket => record.income_bracket.clone(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
pub(crate) fn record(
    year: i32,
    state: &str,
    credit_type: &str,
    sector: &str,
    amount: f64,
    claims: i64,
) -> TaxCreditRecord {
    TaxCreditRecord {
        year,
        state: state.to_string(),
        credit_type: credit_type.to_string(),
        sector: sector.to_string(),
        claimed_amount: amount,
        claims_count: claims,
        income_bracket: "High".to_string(),
        source: "IRS".to_string(),
    }
}
