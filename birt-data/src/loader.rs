//! CSV loading for alternative policy schedules.
//!
//! Two files describe a schedule: a rate table and an exemption table.
//!
//! Rate CSV columns:
//! - `year`: the tax year (e.g., 2025)
//! - `birt_net_income`: BIRT net-income rate as a decimal (e.g., 0.0581)
//! - `birt_gross_receipts`: BIRT gross-receipts rate as a decimal
//! - `npt`: NPT rate as a decimal
//!
//! Exemption CSV columns:
//! - `year`: the tax year
//! - `exemption`: the gross-receipts exemption in whole dollars
//!
//! [`ScheduleLoader::build`] validates what the calculators assume and
//! cannot check themselves: every year present in both tables, no
//! duplicates, no negative amounts, and an exemption that never returns
//! once it reaches zero.

use std::collections::BTreeMap;
use std::io::Read;

use birt_core::{PolicySchedule, RateSet};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading schedule data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("duplicate tax year {0}")]
    DuplicateYear(i32),

    #[error("tax year {0} has rates but no exemption row")]
    MissingExemption(i32),

    #[error("tax year {0} has an exemption row but no rates")]
    MissingRates(i32),

    #[error("negative {column} for tax year {year}")]
    NegativeValue { year: i32, column: &'static str },

    #[error("exemption returns after phase-out in tax year {0}")]
    ExemptionReturns(i32),
}

impl From<csv::Error> for ScheduleLoaderError {
    fn from(err: csv::Error) -> Self {
        ScheduleLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of the rate CSV.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RateRecord {
    pub year: i32,
    pub birt_net_income: Decimal,
    pub birt_gross_receipts: Decimal,
    pub npt: Decimal,
}

/// A single row of the exemption CSV.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ExemptionRecord {
    pub year: i32,
    pub exemption: Decimal,
}

/// Loader assembling a [`PolicySchedule`] from CSV data.
pub struct ScheduleLoader;

impl ScheduleLoader {
    /// Parse rate records from a CSV reader.
    pub fn parse_rates<R: Read>(reader: R) -> Result<Vec<RateRecord>, ScheduleLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: RateRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse exemption records from a CSV reader.
    pub fn parse_exemptions<R: Read>(
        reader: R,
    ) -> Result<Vec<ExemptionRecord>, ScheduleLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ExemptionRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Assembles and validates a schedule from parsed records.
    ///
    /// The credit and estimated-payment rates are not part of the CSV
    /// format; callers supply them (typically the statutory
    /// [`crate::philadelphia::BIRT_CREDIT_RATE`] and
    /// [`crate::philadelphia::NPT_ESTIMATED_RATE`]).
    pub fn build(
        rates: &[RateRecord],
        exemptions: &[ExemptionRecord],
        birt_credit_rate: Decimal,
        npt_estimated_rate: Decimal,
    ) -> Result<PolicySchedule, ScheduleLoaderError> {
        let mut rate_table: BTreeMap<i32, RateSet> = BTreeMap::new();
        for record in rates {
            for (column, value) in [
                ("birt_net_income rate", record.birt_net_income),
                ("birt_gross_receipts rate", record.birt_gross_receipts),
                ("npt rate", record.npt),
            ] {
                if value < Decimal::ZERO {
                    return Err(ScheduleLoaderError::NegativeValue {
                        year: record.year,
                        column,
                    });
                }
            }
            let rate_set = RateSet {
                birt_net_income: record.birt_net_income,
                birt_gross_receipts: record.birt_gross_receipts,
                npt: record.npt,
            };
            if rate_table.insert(record.year, rate_set).is_some() {
                return Err(ScheduleLoaderError::DuplicateYear(record.year));
            }
        }

        let mut exemption_table: BTreeMap<i32, Decimal> = BTreeMap::new();
        for record in exemptions {
            if record.exemption < Decimal::ZERO {
                return Err(ScheduleLoaderError::NegativeValue {
                    year: record.year,
                    column: "exemption",
                });
            }
            if exemption_table.insert(record.year, record.exemption).is_some() {
                return Err(ScheduleLoaderError::DuplicateYear(record.year));
            }
        }

        for year in rate_table.keys() {
            if !exemption_table.contains_key(year) {
                return Err(ScheduleLoaderError::MissingExemption(*year));
            }
        }
        for year in exemption_table.keys() {
            if !rate_table.contains_key(year) {
                return Err(ScheduleLoaderError::MissingRates(*year));
            }
        }

        // The grace rules assume a single phase-out transition.
        let mut phased_out = false;
        for (&year, &exemption) in &exemption_table {
            if exemption.is_zero() {
                phased_out = true;
            } else if phased_out {
                return Err(ScheduleLoaderError::ExemptionReturns(year));
            }
        }

        Ok(PolicySchedule {
            rates: rate_table,
            exemptions: exemption_table,
            birt_credit_rate,
            npt_estimated_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const RATES_CSV: &str = "\
year,birt_net_income,birt_gross_receipts,npt
2024,0.0581,0.001415,0.0375
2025,0.0571,0.00141,0.0374
";

    const EXEMPTIONS_CSV: &str = "\
year,exemption
2024,100000
2025,0
";

    // =========================================================================
    // parse tests
    // =========================================================================

    #[test]
    fn parse_rates_reads_all_rows() {
        let records = ScheduleLoader::parse_rates(RATES_CSV.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            RateRecord {
                year: 2024,
                birt_net_income: dec!(0.0581),
                birt_gross_receipts: dec!(0.001415),
                npt: dec!(0.0375),
            }
        );
    }

    #[test]
    fn parse_exemptions_reads_all_rows() {
        let records = ScheduleLoader::parse_exemptions(EXEMPTIONS_CSV.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[1],
            ExemptionRecord {
                year: 2025,
                exemption: dec!(0),
            }
        );
    }

    #[test]
    fn parse_rates_reports_malformed_rows() {
        let csv = "year,birt_net_income,birt_gross_receipts,npt\n2024,not-a-rate,0.001,0.04\n";

        let result = ScheduleLoader::parse_rates(csv.as_bytes());

        assert!(matches!(result, Err(ScheduleLoaderError::CsvParse(_))));
    }

    // =========================================================================
    // build tests
    // =========================================================================

    #[test]
    fn build_assembles_a_working_schedule() {
        let rates = ScheduleLoader::parse_rates(RATES_CSV.as_bytes()).unwrap();
        let exemptions = ScheduleLoader::parse_exemptions(EXEMPTIONS_CSV.as_bytes()).unwrap();

        let schedule = ScheduleLoader::build(&rates, &exemptions, dec!(0.6), dec!(0.5)).unwrap();

        assert_eq!(schedule.phase_out_year(), Ok(2025));
        assert_eq!(schedule.rate_set(2024).unwrap().npt, dec!(0.0375));
        assert_eq!(schedule.exemption(2024), Ok(dec!(100000)));
        assert_eq!(schedule.birt_credit_rate, dec!(0.6));
    }

    #[test]
    fn build_rejects_duplicate_years() {
        let rates = vec![
            RateRecord {
                year: 2024,
                birt_net_income: dec!(0.06),
                birt_gross_receipts: dec!(0.001),
                npt: dec!(0.04),
            },
            RateRecord {
                year: 2024,
                birt_net_income: dec!(0.05),
                birt_gross_receipts: dec!(0.001),
                npt: dec!(0.04),
            },
        ];
        let exemptions = vec![ExemptionRecord {
            year: 2024,
            exemption: dec!(100000),
        }];

        let result = ScheduleLoader::build(&rates, &exemptions, dec!(0.6), dec!(0.5));

        assert_eq!(result, Err(ScheduleLoaderError::DuplicateYear(2024)));
    }

    #[test]
    fn build_rejects_rate_years_without_exemptions() {
        let rates = ScheduleLoader::parse_rates(RATES_CSV.as_bytes()).unwrap();
        let exemptions = vec![ExemptionRecord {
            year: 2024,
            exemption: dec!(100000),
        }];

        let result = ScheduleLoader::build(&rates, &exemptions, dec!(0.6), dec!(0.5));

        assert_eq!(result, Err(ScheduleLoaderError::MissingExemption(2025)));
    }

    #[test]
    fn build_rejects_exemption_years_without_rates() {
        let rates = ScheduleLoader::parse_rates(RATES_CSV.as_bytes()).unwrap();
        let mut exemptions =
            ScheduleLoader::parse_exemptions(EXEMPTIONS_CSV.as_bytes()).unwrap();
        exemptions.push(ExemptionRecord {
            year: 2026,
            exemption: dec!(0),
        });

        let result = ScheduleLoader::build(&rates, &exemptions, dec!(0.6), dec!(0.5));

        assert_eq!(result, Err(ScheduleLoaderError::MissingRates(2026)));
    }

    #[test]
    fn build_rejects_negative_rates() {
        let rates = vec![RateRecord {
            year: 2024,
            birt_net_income: dec!(-0.01),
            birt_gross_receipts: dec!(0.001),
            npt: dec!(0.04),
        }];
        let exemptions = vec![ExemptionRecord {
            year: 2024,
            exemption: dec!(100000),
        }];

        let result = ScheduleLoader::build(&rates, &exemptions, dec!(0.6), dec!(0.5));

        assert_eq!(
            result,
            Err(ScheduleLoaderError::NegativeValue {
                year: 2024,
                column: "birt_net_income rate",
            })
        );
    }

    #[test]
    fn build_rejects_an_exemption_that_returns_after_phase_out() {
        let years = [2023, 2024, 2025, 2026];
        let rates: Vec<RateRecord> = years
            .iter()
            .map(|&year| RateRecord {
                year,
                birt_net_income: dec!(0.06),
                birt_gross_receipts: dec!(0.001),
                npt: dec!(0.04),
            })
            .collect();
        let exemptions = vec![
            ExemptionRecord {
                year: 2023,
                exemption: dec!(100000),
            },
            ExemptionRecord {
                year: 2024,
                exemption: dec!(0),
            },
            ExemptionRecord {
                year: 2025,
                exemption: dec!(100000),
            },
            ExemptionRecord {
                year: 2026,
                exemption: dec!(0),
            },
        ];

        let result = ScheduleLoader::build(&rates, &exemptions, dec!(0.6), dec!(0.5));

        assert_eq!(result, Err(ScheduleLoaderError::ExemptionReturns(2025)));
    }
}
