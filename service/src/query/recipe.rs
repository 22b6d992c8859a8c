//! [`Query`] for costing a [`Recipe`].

use common::Money;
use tracerr::Traced;

use crate::{
    domain::recipe::{self, Recipe},
    Query, Service,
};

/// [`Query`] calculating a raw cost and a final price of a [`Recipe`].
#[derive(Clone, Debug)]
pub struct Calculate {
    /// [`recipe::Ingredient`]s of the [`Recipe`].
    pub ingredients: Vec<recipe::Ingredient>,

    /// [`recipe::Margin`] to apply.
    ///
    /// [`recipe::Margin::default()`] is used if [`None`].
    pub margin: Option<recipe::Margin>,
}

/// Output of the [`Calculate`] [`Query`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Output {
    /// Sum of all the [`recipe::Ingredient`] costs.
    pub raw_cost: Money,

    /// Raw cost with the [`recipe::Margin`] applied.
    pub final_price: Money,
}

impl<Db> Query<Calculate> for Service<Db> {
    type Ok = Output;
    type Err = Traced<recipe::RecipeError>;

    async fn execute(
        &self,
        Calculate {
            ingredients,
            margin,
        }: Calculate,
    ) -> Result<Self::Ok, Self::Err> {
        let recipe = Recipe::new(ingredients).map_err(tracerr::wrap!())?;

        Ok(Output {
            raw_cost: recipe.raw_cost().map_err(tracerr::wrap!())?,
            final_price: recipe
                .final_price(margin.unwrap_or_default())
                .map_err(tracerr::wrap!())?,
        })
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use crate::{
        domain::recipe::{Ingredient, Margin, RecipeError},
        fixture, Query as _,
    };

    use super::Calculate;

    fn ingredient(quantity: &str, price: &str) -> Ingredient {
        Ingredient {
            quantity: quantity.parse().unwrap(),
            price_per_unit: fixture::rub(price),
        }
    }

    #[tokio::test]
    async fn applies_default_margin() {
        let svc = fixture::service();

        let out = svc
            .execute(Calculate {
                ingredients: vec![
                    ingredient("2", "10.50"),
                    ingredient("0.5", "3.00"),
                ],
                margin: None,
            })
            .await
            .unwrap();

        assert_eq!(out.raw_cost, fixture::rub("22.50"));
        assert_eq!(out.final_price, fixture::rub("33.75"));
    }

    #[tokio::test]
    async fn applies_explicit_margin() {
        let svc = fixture::service();

        let out = svc
            .execute(Calculate {
                ingredients: vec![ingredient("3", "0.10")],
                margin: Margin::new(Decimal::from(150)),
            })
            .await
            .unwrap();

        assert_eq!(out.raw_cost, fixture::rub("0.30"));
        assert_eq!(out.final_price, fixture::rub("0.75"));
    }

    #[tokio::test]
    async fn rejects_empty_recipe() {
        let svc = fixture::service();

        let err = svc
            .execute(Calculate {
                ingredients: vec![],
                margin: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.into_inner(), RecipeError::EmptyRecipe);
    }
}
