use serde::{Deserialize, Serialize};

use crate::config::CreditPolicy;
use crate::decimal::Rate;
use crate::errors::{CreditError, Result};
use crate::types::{VehicleCategory, VehicleCondition};

/// a tenor range with its annual flat rate, inclusive of both bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBracket {
    pub min_tenor: u32,
    pub max_tenor: u32,
    pub annual_rate: Rate,
}

impl RateBracket {
    pub fn new(min_tenor: u32, max_tenor: u32, annual_rate: Rate) -> Self {
        Self {
            min_tenor,
            max_tenor,
            annual_rate,
        }
    }

    pub fn contains(&self, tenor: u32) -> bool {
        tenor >= self.min_tenor && tenor <= self.max_tenor
    }
}

/// ordered, contiguous, non-empty list of rate brackets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RateBracket>", into = "Vec<RateBracket>")]
pub struct RateTable {
    brackets: Vec<RateBracket>,
}

impl RateTable {
    /// build a table, rejecting gaps, overlaps and negative rates
    pub fn new(brackets: Vec<RateBracket>) -> Result<Self> {
        check_brackets(&brackets)?;
        Ok(Self { brackets })
    }

    /// build from brackets known to be well formed
    pub(crate) fn from_sorted(brackets: Vec<RateBracket>) -> Self {
        debug_assert!(check_brackets(&brackets).is_ok());
        Self { brackets }
    }

    pub fn brackets(&self) -> &[RateBracket] {
        &self.brackets
    }

    /// longest tenor covered by a bracket
    pub fn max_tenor(&self) -> u32 {
        self.brackets[self.brackets.len() - 1].max_tenor
    }

    /// rate for a tenor; tenors outside the table resolve to the nearest end bracket
    pub fn rate_for(&self, tenor: u32) -> Rate {
        self.bracket_for(tenor).annual_rate
    }

    pub fn bracket_for(&self, tenor: u32) -> &RateBracket {
        let first = &self.brackets[0];
        if tenor < first.min_tenor {
            return first;
        }

        self.brackets
            .iter()
            .find(|b| b.contains(tenor))
            .unwrap_or(&self.brackets[self.brackets.len() - 1])
    }
}

impl TryFrom<Vec<RateBracket>> for RateTable {
    type Error = CreditError;

    fn try_from(brackets: Vec<RateBracket>) -> Result<Self> {
        RateTable::new(brackets)
    }
}

impl From<RateTable> for Vec<RateBracket> {
    fn from(table: RateTable) -> Self {
        table.brackets
    }
}

fn check_brackets(brackets: &[RateBracket]) -> Result<()> {
    let invalid = |message: String| -> Result<()> { Err(CreditError::InvalidConfiguration { message }) };

    let Some(first) = brackets.first() else {
        return invalid("rate table must have at least one bracket".to_string());
    };
    if first.min_tenor == 0 {
        return invalid("rate brackets must start at a tenor of at least 1".to_string());
    }

    for bracket in brackets {
        if bracket.min_tenor > bracket.max_tenor {
            return invalid(format!(
                "rate bracket {}-{} has its bounds reversed",
                bracket.min_tenor, bracket.max_tenor
            ));
        }
        if bracket.annual_rate.is_negative() {
            return invalid(format!(
                "rate bracket {}-{} has a negative rate {}",
                bracket.min_tenor, bracket.max_tenor, bracket.annual_rate
            ));
        }
    }

    for pair in brackets.windows(2) {
        // a bracket ending at u32::MAX leaves no room for a successor
        if pair[0].max_tenor.checked_add(1) != Some(pair[1].min_tenor) {
            return invalid(format!(
                "rate brackets {}-{} and {}-{} are not contiguous",
                pair[0].min_tenor, pair[0].max_tenor, pair[1].min_tenor, pair[1].max_tenor
            ));
        }
    }

    Ok(())
}

impl CreditPolicy {
    /// default annual flat rate for a category, condition and tenor
    pub fn default_interest_rate(
        &self,
        category: VehicleCategory,
        condition: VehicleCondition,
        tenor: u32,
    ) -> Rate {
        let rate = self
            .interest_rates
            .get(category)
            .get(condition)
            .rate_for(tenor);

        tracing::debug!(%category, %condition, tenor, %rate, "resolved default interest rate");
        rate
    }
}

/// default annual flat rate under the standard policy
pub fn get_default_interest_rate(
    category: VehicleCategory,
    condition: VehicleCondition,
    tenor: u32,
) -> Rate {
    CreditPolicy::standard_ref().default_interest_rate(category, condition, tenor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pct(p: rust_decimal::Decimal) -> Rate {
        Rate::from_percentage_decimal(p)
    }

    #[test]
    fn test_bracket_upper_bound_is_inclusive() {
        use VehicleCategory::*;
        use VehicleCondition::*;

        assert_eq!(get_default_interest_rate(Mobil, Baru, 36), pct(dec!(8.0)));
        assert_eq!(get_default_interest_rate(Mobil, Baru, 37), pct(dec!(8.5)));
        assert_eq!(get_default_interest_rate(Mobil, Baru, 12), pct(dec!(6.5)));
        assert_eq!(get_default_interest_rate(Mobil, Baru, 13), pct(dec!(7.0)));
        assert_eq!(get_default_interest_rate(Mobil, Baru, 60), pct(dec!(9.0)));
    }

    #[test]
    fn test_rates_by_category_and_condition() {
        use VehicleCategory::*;
        use VehicleCondition::*;

        assert_eq!(get_default_interest_rate(Mobil, Bekas, 24), pct(dec!(10.5)));
        assert_eq!(get_default_interest_rate(Motor, Baru, 24), pct(dec!(13.5)));
        assert_eq!(get_default_interest_rate(Motor, Bekas, 48), pct(dec!(19.5)));

        // used vehicles never carry a lower default rate than new ones
        for category in VehicleCategory::ALL {
            for tenor in 1..=60 {
                assert!(
                    get_default_interest_rate(category, Bekas, tenor)
                        > get_default_interest_rate(category, Baru, tenor)
                );
            }
        }
    }

    #[test]
    fn test_out_of_table_tenors_resolve_to_end_brackets() {
        use VehicleCategory::*;
        use VehicleCondition::*;

        assert_eq!(get_default_interest_rate(Mobil, Baru, 0), pct(dec!(6.5)));
        assert_eq!(get_default_interest_rate(Motor, Baru, 60), pct(dec!(16.5)));
        assert_eq!(get_default_interest_rate(Motor, Baru, 500), pct(dec!(16.5)));
    }

    #[test]
    fn test_rate_table_rejects_bad_brackets() {
        let gap = RateTable::new(vec![
            RateBracket::new(1, 12, Rate::from_percentage(5)),
            RateBracket::new(14, 24, Rate::from_percentage(6)),
        ]);
        assert!(matches!(gap, Err(CreditError::InvalidConfiguration { .. })));

        let overlap = RateTable::new(vec![
            RateBracket::new(1, 12, Rate::from_percentage(5)),
            RateBracket::new(12, 24, Rate::from_percentage(6)),
        ]);
        assert!(overlap.is_err());

        assert!(RateTable::new(Vec::new()).is_err());
        assert!(RateTable::new(vec![RateBracket::new(0, 12, Rate::ZERO)]).is_err());
        assert!(RateTable::new(vec![RateBracket::new(12, 1, Rate::ZERO)]).is_err());
        assert!(RateTable::new(vec![RateBracket::new(
            1,
            12,
            Rate::from_decimal(dec!(-0.01))
        )])
        .is_err());

        let unbounded_then_more = RateTable::new(vec![
            RateBracket::new(1, u32::MAX, Rate::from_percentage(5)),
            RateBracket::new(1, 12, Rate::from_percentage(6)),
        ]);
        assert!(matches!(
            unbounded_then_more,
            Err(CreditError::InvalidConfiguration { .. })
        ));

        let open_ended = RateTable::new(vec![
            RateBracket::new(1, 12, Rate::from_percentage(5)),
            RateBracket::new(13, u32::MAX, Rate::from_percentage(6)),
        ])
        .unwrap();
        assert_eq!(open_ended.rate_for(u32::MAX), Rate::from_percentage(6));

        let single = RateTable::new(vec![RateBracket::new(1, 12, Rate::from_percentage(5))]).unwrap();
        assert_eq!(single.max_tenor(), 12);
        assert_eq!(single.rate_for(7), Rate::from_percentage(5));
    }

    #[test]
    fn test_rate_table_deserialization_is_checked() {
        let json = r#"[{"min_tenor":1,"max_tenor":12,"annual_rate":"0.05"},{"min_tenor":20,"max_tenor":24,"annual_rate":"0.06"}]"#;
        assert!(serde_json::from_str::<RateTable>(json).is_err());

        let json = r#"[{"min_tenor":1,"max_tenor":12,"annual_rate":"0.05"},{"min_tenor":13,"max_tenor":24,"annual_rate":0.06}]"#;
        let table: RateTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.rate_for(13), Rate::from_percentage(6));
    }
}
