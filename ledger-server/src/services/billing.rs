//! Billing Calculator
//!
//! Rate resolution and amount arithmetic for billable time. Amounts are
//! computed in `Decimal` and rounded to 2 decimals before storage; the
//! REAL column only ever sees the rounded value.

use rust_decimal::prelude::*;
use shared::models::{Employee, Project, TimeCategory};

use crate::core::EngineSettings;
use crate::utils::{AppError, AppResult};

/// Rate candidates for one entry, in precedence order. Only loaded rows
/// participate; an unset association contributes nothing.
#[derive(Debug, Default)]
pub struct RateSources<'a> {
    /// Per-entry override supplied by the caller
    pub override_rate: Option<f64>,
    pub category: Option<&'a TimeCategory>,
    pub project: Option<&'a Project>,
    pub employee: Option<&'a Employee>,
}

/// Resolve the hourly rate for a billable entry.
///
/// First positive candidate wins: entry override, category default,
/// project rate, employee default, configured engine default. A billable
/// entry with no resolvable rate is a hard error so it can never be
/// silently billed at zero.
pub fn resolve_rate(sources: &RateSources<'_>, settings: &EngineSettings) -> AppResult<f64> {
    let candidates = [
        sources.override_rate,
        sources.category.and_then(|c| c.default_billing_rate),
        sources.project.and_then(|p| p.billing_rate),
        sources.employee.and_then(|e| e.default_billing_rate),
        settings.default_billing_rate,
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|rate| *rate > 0.0)
        .ok_or_else(|| {
            AppError::business_rule("No billing rate could be determined for billable time entry")
        })
}

/// rate × (minutes / 60), rounded half-up to 2 decimal places.
pub fn billing_amount(duration_minutes: i64, rate: f64) -> f64 {
    let hours = Decimal::from(duration_minutes) / Decimal::from(60);
    let rate = Decimal::from_f64(rate).unwrap_or_default();
    (hours * rate)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(rate: Option<f64>) -> TimeCategory {
        TimeCategory {
            id: 1,
            tenant_id: 1,
            name: "Consulting".into(),
            is_active: true,
            is_billable_default: true,
            default_billing_rate: rate,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn project(rate: Option<f64>) -> Project {
        Project {
            id: 2,
            tenant_id: 1,
            name: "Rollout".into(),
            billing_rate: rate,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn employee(rate: Option<f64>) -> Employee {
        Employee {
            id: 3,
            tenant_id: 1,
            display_name: "Dana".into(),
            email: None,
            user_id: None,
            manager_id: None,
            default_billing_rate: rate,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn fallback_chain_order() {
        let settings = EngineSettings {
            default_billing_rate: Some(50.0),
            ..Default::default()
        };
        let cat = category(Some(80.0));
        let proj = project(Some(90.0));
        let emp = employee(Some(70.0));

        let mut sources = RateSources {
            override_rate: Some(120.0),
            category: Some(&cat),
            project: Some(&proj),
            employee: Some(&emp),
        };
        assert_eq!(resolve_rate(&sources, &settings).unwrap(), 120.0);

        sources.override_rate = None;
        assert_eq!(resolve_rate(&sources, &settings).unwrap(), 80.0);

        sources.category = None;
        assert_eq!(resolve_rate(&sources, &settings).unwrap(), 90.0);

        sources.project = None;
        assert_eq!(resolve_rate(&sources, &settings).unwrap(), 70.0);

        sources.employee = None;
        assert_eq!(resolve_rate(&sources, &settings).unwrap(), 50.0);
    }

    #[test]
    fn zero_rates_are_skipped() {
        let settings = EngineSettings {
            default_billing_rate: Some(55.0),
            ..Default::default()
        };
        let cat = category(Some(0.0));
        let sources = RateSources {
            override_rate: Some(0.0),
            category: Some(&cat),
            ..Default::default()
        };
        assert_eq!(resolve_rate(&sources, &settings).unwrap(), 55.0);
    }

    #[test]
    fn unpriceable_billable_entry_is_rejected() {
        let settings = EngineSettings::default();
        let err = resolve_rate(&RateSources::default(), &settings).unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }

    #[test]
    fn amount_rounds_to_two_decimals() {
        // 90 minutes at 75/h = 112.50
        assert_eq!(billing_amount(90, 75.0), 112.5);
        // 50 minutes at 100/h = 83.333... -> 83.33
        assert_eq!(billing_amount(50, 100.0), 83.33);
        // midpoint rounds away from zero: 1 minute at 99.9/h = 1.665 -> 1.67
        assert_eq!(billing_amount(1, 99.9), 1.67);
    }
}
