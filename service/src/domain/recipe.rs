//! [`Recipe`] costing definitions.

use common::{Currency, Money};
use derive_more::{Display, Error, Into};
use rust_decimal::Decimal;

/// Single ingredient of a [`Recipe`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ingredient {
    /// Quantity of this [`Ingredient`] used by a [`Recipe`].
    pub quantity: Decimal,

    /// Price of a single unit of this [`Ingredient`].
    pub price_per_unit: Money,
}

/// Non-negative markup applied on top of a [`Recipe`] raw cost, in percents.
///
/// Unlike [`common::Percent`], a [`Margin`] may exceed `100`.
#[derive(Clone, Copy, Debug, Display, Eq, Into, PartialEq)]
pub struct Margin(Decimal);

impl Margin {
    /// Creates a new [`Margin`] if the provided `percents` is non-negative.
    #[must_use]
    pub fn new(percents: Decimal) -> Option<Self> {
        (!percents.is_sign_negative() || percents.is_zero())
            .then_some(Self(percents))
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self(Decimal::from(50))
    }
}

/// Product made out of [`Ingredient`]s.
#[derive(Clone, Debug)]
pub struct Recipe {
    /// [`Ingredient`]s of this [`Recipe`].
    ingredients: Vec<Ingredient>,

    /// [`Currency`] shared by all the [`Ingredient`]s.
    currency: Currency,
}

impl Recipe {
    /// Creates a new [`Recipe`] out of the provided [`Ingredient`]s.
    ///
    /// # Errors
    ///
    /// See [`RecipeError`] for details.
    pub fn new(ingredients: Vec<Ingredient>) -> Result<Self, RecipeError> {
        let currency = ingredients
            .first()
            .ok_or(RecipeError::EmptyRecipe)?
            .price_per_unit
            .currency;
        for i in &ingredients {
            if i.price_per_unit.currency != currency {
                return Err(RecipeError::CurrencyMismatch);
            }
            if i.quantity.is_sign_negative() && !i.quantity.is_zero() {
                return Err(RecipeError::NegativeQuantity);
            }
            if i.price_per_unit.is_negative() {
                return Err(RecipeError::NegativePrice);
            }
        }
        Ok(Self {
            ingredients,
            currency,
        })
    }

    /// Returns the [`Ingredient`]s of this [`Recipe`].
    #[must_use]
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    /// Calculates the rounded sum of all the [`Ingredient`] costs.
    ///
    /// # Errors
    ///
    /// With [`RecipeError::Overflow`] if the sum doesn't fit a [`Decimal`].
    pub fn raw_cost(&self) -> Result<Money, RecipeError> {
        self.ingredients
            .iter()
            .try_fold(Money::zero(self.currency), |sum, i| {
                sum.checked_add(i.price_per_unit.checked_mul(i.quantity)?)
            })
            .map(Money::round)
            .ok_or(RecipeError::Overflow)
    }

    /// Calculates the rounded final price of this [`Recipe`] with the
    /// provided [`Margin`] applied.
    ///
    /// # Errors
    ///
    /// With [`RecipeError::Overflow`] if the price doesn't fit a [`Decimal`].
    pub fn final_price(&self, margin: Margin) -> Result<Money, RecipeError> {
        let markup = Decimal::ONE
            .checked_add(margin.0 / Decimal::ONE_HUNDRED)
            .ok_or(RecipeError::Overflow)?;
        self.raw_cost()?
            .checked_mul(markup)
            .map(Money::round)
            .ok_or(RecipeError::Overflow)
    }
}

/// Error of costing a [`Recipe`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum RecipeError {
    /// No [`Ingredient`]s provided.
    #[display("Recipe has no ingredients")]
    EmptyRecipe,

    /// [`Ingredient`] prices are in different [`Currency`]s.
    #[display("Ingredient prices must share a currency")]
    CurrencyMismatch,

    /// Some [`Ingredient`] quantity is negative.
    #[display("Ingredient quantity must not be negative")]
    NegativeQuantity,

    /// Some [`Ingredient`] price is negative.
    #[display("Ingredient price must not be negative")]
    NegativePrice,

    /// Calculation overflowed.
    #[display("Recipe cost is too large")]
    Overflow,
}

#[cfg(test)]
mod spec {
    use common::{Currency, Money};
    use rust_decimal::Decimal;

    use super::{Ingredient, Margin, Recipe, RecipeError};

    fn item(quantity: &str, price: &str, currency: Currency) -> Ingredient {
        Ingredient {
            quantity: quantity.parse().unwrap(),
            price_per_unit: Money::new(price.parse().unwrap(), currency),
        }
    }

    #[test]
    fn calculates_raw_cost_and_final_price() {
        let recipe = Recipe::new(vec![
            item("2", "10.50", Currency::Rub),
            item("0.5", "3.00", Currency::Rub),
        ])
        .unwrap();

        assert_eq!(recipe.raw_cost().unwrap().to_string(), "22.50RUB");
        assert_eq!(
            recipe.final_price(Margin::default()).unwrap().to_string(),
            "33.75RUB",
        );
    }

    #[test]
    fn allows_margin_above_hundred() {
        let recipe = Recipe::new(vec![item("1", "10", Currency::Usd)]).unwrap();
        let margin = Margin::new(Decimal::from(250)).unwrap();

        assert_eq!(
            recipe.final_price(margin).unwrap(),
            Money::new(35.into(), Currency::Usd),
        );
        assert_eq!(
            recipe.final_price(Margin::new(Decimal::ZERO).unwrap()).unwrap(),
            Money::new(10.into(), Currency::Usd),
        );
    }

    #[test]
    fn rejects_negative_margin() {
        assert!(Margin::new(Decimal::NEGATIVE_ONE).is_none());
    }

    #[test]
    fn rejects_invalid_recipes() {
        assert_eq!(Recipe::new(vec![]).unwrap_err(), RecipeError::EmptyRecipe);
        assert_eq!(
            Recipe::new(vec![
                item("1", "1", Currency::Rub),
                item("1", "1", Currency::Eur),
            ])
            .unwrap_err(),
            RecipeError::CurrencyMismatch,
        );
        assert_eq!(
            Recipe::new(vec![item("-1", "1", Currency::Rub)]).unwrap_err(),
            RecipeError::NegativeQuantity,
        );
    }
}
