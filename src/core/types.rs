use serde::Serialize;

use super::error::InvalidDomainError;

pub const MAX_YEARS: u32 = 200;
pub const MAX_COMPOUNDS_PER_YEAR: u32 = 10_000;
pub const MAX_CONTRIBUTIONS_PER_YEAR: u32 = 10_000;
pub const MAX_PERIODS: u64 = 1_000_000;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CompoundFrequency {
    Annually,
    SemiAnnually,
    Quarterly,
    Monthly,
    Daily,
}

impl CompoundFrequency {
    pub fn per_year(self) -> u32 {
        match self {
            CompoundFrequency::Annually => 1,
            CompoundFrequency::SemiAnnually => 2,
            CompoundFrequency::Quarterly => 4,
            CompoundFrequency::Monthly => 12,
            CompoundFrequency::Daily => 365,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ContributionFrequency {
    Annually,
    SemiAnnually,
    Quarterly,
    Monthly,
    Weekly,
}

impl ContributionFrequency {
    pub fn per_year(self) -> u32 {
        match self {
            ContributionFrequency::Annually => 1,
            ContributionFrequency::SemiAnnually => 2,
            ContributionFrequency::Quarterly => 4,
            ContributionFrequency::Monthly => 12,
            ContributionFrequency::Weekly => 52,
        }
    }
}

/// Validated parameters for one projection run.
///
/// The only way to obtain a value is [`ProjectionInput::new`], so the engine
/// can treat every instance as being inside its domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionInput {
    principal: f64,
    annual_rate_percent: f64,
    years: u32,
    compounds_per_year: u32,
    contribution_amount: f64,
    contributions_per_year: u32,
}

impl ProjectionInput {
    pub fn new(
        principal: f64,
        annual_rate_percent: f64,
        years: u32,
        compounds_per_year: u32,
        contribution_amount: f64,
        contributions_per_year: u32,
    ) -> Result<Self, InvalidDomainError> {
        for (field, value) in [
            ("principal", principal),
            ("annual rate", annual_rate_percent),
            ("contribution amount", contribution_amount),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(InvalidDomainError::NegativeAmount { field, value });
            }
        }

        for (field, value, max) in [
            (
                "compounds per year",
                compounds_per_year,
                MAX_COMPOUNDS_PER_YEAR,
            ),
            (
                "contributions per year",
                contributions_per_year,
                MAX_CONTRIBUTIONS_PER_YEAR,
            ),
        ] {
            if value == 0 {
                return Err(InvalidDomainError::ZeroFrequency { field });
            }
            if value > max {
                return Err(InvalidDomainError::FrequencyTooLarge { field, value, max });
            }
        }

        if years > MAX_YEARS {
            return Err(InvalidDomainError::TooManyYears {
                value: years,
                max: MAX_YEARS,
            });
        }

        let periods = (u64::from(years) + 1) * u64::from(compounds_per_year);
        if periods > MAX_PERIODS {
            return Err(InvalidDomainError::TooManyPeriods {
                periods,
                max: MAX_PERIODS,
            });
        }

        Ok(Self {
            principal,
            annual_rate_percent,
            years,
            compounds_per_year,
            contribution_amount,
            contributions_per_year,
        })
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn annual_rate_percent(&self) -> f64 {
        self.annual_rate_percent
    }

    pub fn years(&self) -> u32 {
        self.years
    }

    pub fn compounds_per_year(&self) -> u32 {
        self.compounds_per_year
    }

    pub fn contribution_amount(&self) -> f64 {
        self.contribution_amount
    }

    pub fn contributions_per_year(&self) -> u32 {
        self.contributions_per_year
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSnapshot {
    pub year: u32,
    pub starting_balance: f64,
    pub yearly_contribution: f64,
    pub yearly_interest: f64,
    pub cumulative_contributions: f64,
    pub cumulative_interest: f64,
    pub ending_balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub principal: f64,
    pub snapshots: Vec<YearSnapshot>,
    pub final_balance: f64,
}

impl Projection {
    pub fn total_contributions(&self) -> f64 {
        self.snapshots
            .last()
            .map_or(0.0, |s| s.cumulative_contributions)
    }

    pub fn total_interest(&self) -> f64 {
        self.snapshots.last().map_or(0.0, |s| s.cumulative_interest)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRow {
    pub year: u32,
    pub principal: f64,
    pub contributions: f64,
    pub interest: f64,
    pub total: f64,
    pub yearly_interest: f64,
    pub yearly_contribution: f64,
    pub starting_balance: f64,
}
