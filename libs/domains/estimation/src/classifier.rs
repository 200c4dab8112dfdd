//! Sorts plan resources into priced, unestimateable and unsupported.

use tracing::debug;

use crate::asset::PriceableAsset;
use crate::models::PricingFailure;
use crate::plan::PlanDocument;
use crate::registry::AssetPricerRegistry;

/// A resource with a registered pricer and the assets it produced
#[derive(Debug)]
pub struct PricedResource {
    pub address: String,
    pub resource_type: String,
    pub assets: Vec<Box<dyn PriceableAsset>>,
}

#[derive(Debug, Default)]
pub struct Classification {
    pub priced: Vec<PricedResource>,
    /// Addresses of resources known to carry no direct charge
    pub unestimateable: Vec<String>,
    /// Addresses of resources of types nobody prices
    pub unsupported: Vec<String>,
    /// Registered resources whose attributes could not be decoded
    pub failures: Vec<PricingFailure>,
}

/// Classify every change of `target_provider` in plan order.
///
/// Changes of other providers and pure deletions are skipped.
pub fn classify(
    plan: &PlanDocument,
    registry: &AssetPricerRegistry,
    target_provider: &str,
) -> Classification {
    let mut classification = Classification::default();

    for change in &plan.resource_changes {
        if change.provider_name != target_provider {
            continue;
        }
        if change.is_delete_only() {
            debug!(address = %change.address, "Skipping deleted resource");
            continue;
        }

        if registry.contains(&change.resource_type) {
            match registry.generate_priceable_assets(change) {
                Ok(assets) => classification.priced.push(PricedResource {
                    address: change.address.clone(),
                    resource_type: change.resource_type.clone(),
                    assets,
                }),
                Err(e) => classification.failures.push(PricingFailure {
                    address: change.address.clone(),
                    resource_type: change.resource_type.clone(),
                    asset: None,
                    reason: e.to_string(),
                }),
            }
        } else if registry.is_non_billable(&change.resource_type) {
            classification.unestimateable.push(change.address.clone());
        } else {
            classification.unsupported.push(change.address.clone());
        }
    }

    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure::AZURERM_PROVIDER;
    use crate::plan::parse_plan;

    fn plan(changes: serde_json::Value) -> PlanDocument {
        parse_plan(&serde_json::to_vec(&serde_json::json!({ "resource_changes": changes })).unwrap())
            .unwrap()
    }

    fn resource(address: &str, resource_type: &str, provider: &str, after: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "address": address,
            "type": resource_type,
            "provider_name": provider,
            "change": {"actions": ["create"], "after": after}
        })
    }

    #[test]
    fn test_classify_buckets() {
        let plan = plan(serde_json::json!([
            resource(
                "azurerm_linux_virtual_machine.web",
                "azurerm_linux_virtual_machine",
                AZURERM_PROVIDER,
                serde_json::json!({"size": "Standard_B2s", "location": "eastus"})
            ),
            resource("azurerm_resource_group.rg", "azurerm_resource_group", AZURERM_PROVIDER, serde_json::json!({})),
            resource("azurerm_cosmosdb_account.db", "azurerm_cosmosdb_account", AZURERM_PROVIDER, serde_json::json!({})),
            resource(
                "aws_instance.other",
                "aws_instance",
                "registry.terraform.io/hashicorp/aws",
                serde_json::json!({})
            ),
        ]));

        let classification = classify(&plan, &AssetPricerRegistry::azure(), AZURERM_PROVIDER);

        assert_eq!(classification.priced.len(), 1);
        assert_eq!(classification.priced[0].address, "azurerm_linux_virtual_machine.web");
        assert_eq!(classification.unestimateable, vec!["azurerm_resource_group.rg"]);
        assert_eq!(classification.unsupported, vec!["azurerm_cosmosdb_account.db"]);
        assert!(classification.failures.is_empty());
    }

    #[test]
    fn test_malformed_resource_becomes_failure() {
        let plan = plan(serde_json::json!([resource(
            "azurerm_managed_disk.huge",
            "azurerm_managed_disk",
            AZURERM_PROVIDER,
            serde_json::json!({"location": "eastus", "disk_size_gb": 99999, "storage_account_type": "Premium_LRS"})
        )]));

        let classification = classify(&plan, &AssetPricerRegistry::azure(), AZURERM_PROVIDER);

        assert!(classification.priced.is_empty());
        assert_eq!(classification.failures.len(), 1);
        assert_eq!(classification.failures[0].address, "azurerm_managed_disk.huge");
        assert_eq!(classification.failures[0].asset, None);
    }

    #[test]
    fn test_deleted_resources_are_skipped() {
        let plan = plan(serde_json::json!([{
            "address": "azurerm_linux_virtual_machine.old",
            "type": "azurerm_linux_virtual_machine",
            "provider_name": AZURERM_PROVIDER,
            "change": {"actions": ["delete"], "after": null}
        }]));

        let classification = classify(&plan, &AssetPricerRegistry::azure(), AZURERM_PROVIDER);

        assert!(classification.priced.is_empty());
        assert!(classification.failures.is_empty());
        assert!(classification.unsupported.is_empty());
    }
}
