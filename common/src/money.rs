//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal};

use crate::define_kind;

/// Amount of money in some [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Adds the provided [`Money`] to this one.
    ///
    /// [`None`] is returned if the currencies differ or the amount
    /// overflows.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        (self.currency == other.currency)
            .then(|| {
                self.amount.checked_add(other.amount).map(|amount| Self {
                    amount,
                    currency: self.currency,
                })
            })
            .flatten()
    }

    /// Multiplies this [`Money`] by the provided scalar.
    ///
    /// [`None`] is returned if the amount overflows.
    #[must_use]
    pub fn checked_mul(self, by: Decimal) -> Option<Self> {
        self.amount.checked_mul(by).map(|amount| Self {
            amount,
            currency: self.currency,
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        if amount.is_integer() {
            write!(f, "{}{currency}", amount.to_i128().expect("integer"))
        } else {
            write!(f, "{amount}{currency}")
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 {
            return Err("too short");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency =
            Currency::from_str(currency).map_err(|_| "invalid currency")?;

        Ok(Self { amount, currency })
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "Kenyan Shilling."]
        Kes = 1,

        #[doc = "US Dollar."]
        Usd = 2,

        #[doc = "Euro."]
        Eur = 3,
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Money in `{major}.{minor}{currency}` format, where:
    /// - `major` is an integer;
    /// - `minor` is an optional integer;
    /// - `currency` is a three-letter currency code.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn kes(s: &str) -> Money {
        Money {
            amount: decimal(s),
            currency: Currency::Kes,
        }
    }

    #[test]
    fn from_str() {
        assert_eq!(Money::from_str("15000KES").unwrap(), kes("15000"));
        assert_eq!(Money::from_str("123.45KES").unwrap(), kes("123.45"));
        assert_eq!(
            Money::from_str("123.45USD").unwrap(),
            Money {
                amount: decimal("123.45"),
                currency: Currency::Usd,
            },
        );
        assert_eq!(
            Money::from_str("123.45EUR").unwrap(),
            Money {
                amount: decimal("123.45"),
                currency: Currency::Eur,
            },
        );

        assert!(Money::from_str("123.45").is_err());
        assert!(Money::from_str("123.45Ke").is_err());
        assert!(Money::from_str("123.45Shillings").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(kes("123.45").to_string(), "123.45KES");
        assert_eq!(kes("123.00").to_string(), "123KES");
        assert_eq!(kes("123").to_string(), "123KES");
    }

    #[test]
    fn checked_add_requires_same_currency() {
        assert_eq!(
            kes("1000").checked_add(kes("500")).unwrap(),
            kes("1500"),
        );
        assert!(kes("1000")
            .checked_add(Money {
                amount: decimal("500"),
                currency: Currency::Usd,
            })
            .is_none());
    }

    #[test]
    fn checked_mul() {
        assert_eq!(kes("50").checked_mul(decimal("10")).unwrap(), kes("500"));
        assert_eq!(
            kes("50").checked_mul(decimal("2.5")).unwrap(),
            kes("125.0"),
        );
    }
}
