//! Validated subscription purchase.

use crate::domain::catalog::{Catalog, Product};
use crate::domain::foundation::{non_blank, GuildId, PriceId};

use super::errors::CheckoutError;

/// A subscription purchase that passed every storefront check.
///
/// Only a `PurchaseIntent` can be turned into a provider checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseIntent {
    pub guild_id: GuildId,
    pub product: Product,
    pub price_id: PriceId,
}

impl PurchaseIntent {
    /// Validates raw storefront input against the catalog.
    ///
    /// Checks run in order: all three fields present, guild ID format,
    /// product known, product paid, price matches the product.
    pub fn validate(
        catalog: &Catalog,
        price_id: Option<&str>,
        guild_id: Option<&str>,
        bot_name: Option<&str>,
    ) -> Result<Self, CheckoutError> {
        let (price_id, guild_id, bot_name) = match (
            non_blank(price_id),
            non_blank(guild_id),
            non_blank(bot_name),
        ) {
            (Some(p), Some(g), Some(b)) => (p, g, b),
            _ => return Err(CheckoutError::MissingFields),
        };

        let guild_id = GuildId::new(guild_id)?;

        let product = catalog
            .find(bot_name)
            .ok_or_else(|| CheckoutError::UnknownProduct(bot_name.to_string()))?;

        let expected = product
            .price_id
            .as_ref()
            .ok_or_else(|| CheckoutError::FreeProduct(product.name.clone()))?;

        if expected.as_str() != price_id {
            return Err(CheckoutError::PriceMismatch);
        }

        Ok(Self {
            guild_id,
            product: product.clone(),
            price_id: expected.clone(),
        })
    }

    /// Product identifier written into session metadata.
    pub fn bot_name(&self) -> &str {
        &self.product.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAVEL_PRICE: &str = "price_1RqJNHBV80dUyFnbQ70XJRYO";
    const GUILD: &str = "123456789012345678";

    fn validate(
        price: Option<&str>,
        guild: Option<&str>,
        bot: Option<&str>,
    ) -> Result<PurchaseIntent, CheckoutError> {
        PurchaseIntent::validate(&Catalog::standard(), price, guild, bot)
    }

    #[test]
    fn valid_gavel_purchase() {
        let intent = validate(Some(GAVEL_PRICE), Some(GUILD), Some("gavel")).unwrap();
        assert_eq!(intent.guild_id.as_str(), GUILD);
        assert_eq!(intent.bot_name(), "gavel");
        assert_eq!(intent.price_id.as_str(), GAVEL_PRICE);
    }

    #[test]
    fn any_missing_field_is_reported_first() {
        assert_eq!(
            validate(None, Some("bad"), Some("gavel")),
            Err(CheckoutError::MissingFields)
        );
        assert_eq!(
            validate(Some(GAVEL_PRICE), Some(""), Some("gavel")),
            Err(CheckoutError::MissingFields)
        );
        assert_eq!(
            validate(Some(GAVEL_PRICE), Some(GUILD), None),
            Err(CheckoutError::MissingFields)
        );
    }

    #[test]
    fn malformed_guild_is_rejected_before_product_lookup() {
        assert_eq!(
            validate(Some(GAVEL_PRICE), Some("12345abc678901234"), Some("nope")),
            Err(CheckoutError::InvalidGuildId)
        );
        assert_eq!(
            validate(Some(GAVEL_PRICE), Some("12345678901234567890"), Some("gavel")),
            Err(CheckoutError::InvalidGuildId)
        );
    }

    #[test]
    fn unknown_product_is_rejected() {
        assert_eq!(
            validate(Some(GAVEL_PRICE), Some(GUILD), Some("music")),
            Err(CheckoutError::UnknownProduct("music".to_string()))
        );
    }

    #[test]
    fn free_product_is_rejected() {
        assert!(matches!(
            validate(Some("price_anything"), Some(GUILD), Some("intella")),
            Err(CheckoutError::FreeProduct(_))
        ));
    }

    #[test]
    fn price_of_another_product_is_rejected() {
        assert_eq!(
            validate(
                Some("price_1RqJMQBV80dUyFnbodXxowjV"),
                Some(GUILD),
                Some("gavel")
            ),
            Err(CheckoutError::PriceMismatch)
        );
    }

    #[test]
    fn host_alias_is_canonicalized() {
        let intent = validate(
            Some("price_1RqJMaBV80dUyFnbhCpWxsq8"),
            Some(GUILD),
            Some("host"),
        )
        .unwrap();
        assert_eq!(intent.bot_name(), "kojinhost");
    }
}
