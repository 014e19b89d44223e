//! Promo table defaults and code application.

use mountrush_core::{ActivePromo, Promo, PromoCode, PromoKind, PromoTable};
use rust_decimal::Decimal;

/// The promo table used when none is stored.
///
/// - `MOUNT10` - 10% off the subtotal
/// - `FREESHIP` - free shipping
#[must_use]
pub fn default_promos() -> PromoTable {
    let mut table = PromoTable::new();
    if let Ok(code) = PromoCode::parse("MOUNT10") {
        table.insert(
            code,
            Promo::new(PromoKind::Percent, Decimal::from(10), "10% off subtotal"),
        );
    }
    if let Ok(code) = PromoCode::parse("FREESHIP") {
        table.insert(
            code,
            Promo::new(PromoKind::FreeShipping, Decimal::ZERO, "Free shipping"),
        );
    }
    table
}

/// Outcome of applying a promo code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromoApplication {
    /// The code is known and is now the active promo.
    Applied {
        code: PromoCode,
        description: String,
    },
    /// The code is unknown, or blank after trimming. Any previously active
    /// promo was cleared.
    Rejected { code: Option<PromoCode> },
    /// Nothing was entered. The active promo is unchanged.
    MissingCode,
}

impl PromoApplication {
    /// Message shown to the shopper.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Applied { code, description } => format!("Applied {code} - {description}"),
            Self::Rejected { .. } => "Invalid promo code".to_string(),
            Self::MissingCode => "Enter a promo code".to_string(),
        }
    }
}

/// Look `input` up in `table` and update `active` accordingly.
///
/// Only empty input is treated as "nothing entered". Whitespace-only input is
/// a lookup that cannot match, so it clears the active promo.
pub fn apply_code(
    table: &PromoTable,
    active: &mut Option<ActivePromo>,
    input: &str,
) -> PromoApplication {
    if input.is_empty() {
        return PromoApplication::MissingCode;
    }
    let Ok(code) = PromoCode::parse(input) else {
        *active = None;
        return PromoApplication::Rejected { code: None };
    };

    match table.get(&code) {
        Some(promo) => {
            *active = Some(ActivePromo {
                code: code.clone(),
                promo: promo.clone(),
            });
            PromoApplication::Applied {
                code,
                description: promo.description.clone(),
            }
        }
        None => {
            *active = None;
            PromoApplication::Rejected { code: Some(code) }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let table = default_promos();
        assert_eq!(table.len(), 2);
        let mount = table.get(&PromoCode::parse("MOUNT10").unwrap()).unwrap();
        assert_eq!(mount.kind, PromoKind::Percent);
        assert_eq!(mount.description, "10% off subtotal");
    }

    #[test]
    fn test_apply_is_case_insensitive() {
        let table = default_promos();
        let mut active = None;
        let outcome = apply_code(&table, &mut active, "  mount10 ");
        assert_eq!(
            outcome,
            PromoApplication::Applied {
                code: PromoCode::parse("MOUNT10").unwrap(),
                description: "10% off subtotal".to_string(),
            }
        );
        assert_eq!(active.unwrap().code.as_str(), "MOUNT10");
    }

    #[test]
    fn test_unknown_code_clears_active() {
        let table = default_promos();
        let mut active = None;
        apply_code(&table, &mut active, "FREESHIP");
        assert!(active.is_some());

        let outcome = apply_code(&table, &mut active, "BOGUS");
        assert!(matches!(outcome, PromoApplication::Rejected { .. }));
        assert_eq!(outcome.message(), "Invalid promo code");
        assert!(active.is_none());
    }

    #[test]
    fn test_empty_input_leaves_active() {
        let table = default_promos();
        let mut active = None;
        apply_code(&table, &mut active, "mount10");

        let outcome = apply_code(&table, &mut active, "");
        assert_eq!(outcome, PromoApplication::MissingCode);
        assert_eq!(outcome.message(), "Enter a promo code");
        assert!(active.is_some());
    }

    #[test]
    fn test_whitespace_input_clears_active() {
        let table = default_promos();
        let mut active = None;
        apply_code(&table, &mut active, "FREESHIP");
        assert!(active.is_some());

        let outcome = apply_code(&table, &mut active, "   ");
        assert_eq!(outcome, PromoApplication::Rejected { code: None });
        assert_eq!(outcome.message(), "Invalid promo code");
        assert!(active.is_none());
    }

    #[test]
    fn test_applied_message() {
        let outcome = PromoApplication::Applied {
            code: PromoCode::parse("FREESHIP").unwrap(),
            description: "Free shipping".to_string(),
        };
        assert_eq!(outcome.message(), "Applied FREESHIP - Free shipping");
    }
}
