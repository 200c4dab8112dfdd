//! Azure resource pricers.

mod attributes;
pub mod kubernetes;
pub mod managed_disk;
pub mod scale_set;
pub mod virtual_machine;

pub use kubernetes::{ClusterControlPlane, ClusterSkuTier, KubernetesClusterPricer};
pub use managed_disk::{DiskStorageType, ManagedDisk, ManagedDiskPricer};
pub use scale_set::{LegacyScaleSetPricer, LinuxScaleSetPricer, WindowsScaleSetPricer};
pub use virtual_machine::{
    LegacyVirtualMachinePricer, LinuxVirtualMachinePricer, VirtualMachine,
    WindowsVirtualMachinePricer,
};

use crate::registry::AssetPricerRegistry;

/// `provider_name` of azurerm resources in a plan
pub const AZURERM_PROVIDER: &str = "registry.terraform.io/hashicorp/azurerm";

/// Resource types that appear in plans but carry no direct charge
pub const NON_BILLABLE_TYPES: &[&str] = &[
    "azurerm_resource_group",
    "azurerm_virtual_network",
    "azurerm_subnet",
    "azurerm_network_interface",
    "azurerm_network_security_group",
    "azurerm_network_security_rule",
    "azurerm_subnet_network_security_group_association",
    "azurerm_route_table",
    "azurerm_route",
    "azurerm_availability_set",
];

pub fn register_all(registry: &mut AssetPricerRegistry) {
    registry.register(LinuxVirtualMachinePricer);
    registry.register(WindowsVirtualMachinePricer);
    registry.register(LegacyVirtualMachinePricer);
    registry.register(LinuxScaleSetPricer);
    registry.register(WindowsScaleSetPricer);
    registry.register(LegacyScaleSetPricer);
    registry.register(KubernetesClusterPricer);
    registry.register(ManagedDiskPricer);

    for resource_type in NON_BILLABLE_TYPES {
        registry.mark_non_billable(*resource_type);
    }
}
