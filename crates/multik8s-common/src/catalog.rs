//! Fixed option lists offered by the cluster form.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> SelectOption {
    SelectOption { value, label }
}

pub const AWS_REGIONS: &[SelectOption] = &[
    opt("us-east-1", "US East (N. Virginia)"),
    opt("us-west-2", "US West (Oregon)"),
    opt("eu-west-1", "Europe (Ireland)"),
    opt("ap-southeast-1", "Asia Pacific (Singapore)"),
];

pub const AZURE_REGIONS: &[SelectOption] = &[
    opt("eastus", "East US"),
    opt("westus2", "West US 2"),
    opt("westeurope", "West Europe"),
    opt("southeastasia", "Southeast Asia"),
];

pub const AWS_INSTANCE_TYPES: &[SelectOption] = &[
    opt("t3.medium", "t3.medium (2 vCPU, 4 GB RAM)"),
    opt("t3.large", "t3.large (2 vCPU, 8 GB RAM)"),
    opt("m5.large", "m5.large (2 vCPU, 8 GB RAM)"),
    opt("m5.xlarge", "m5.xlarge (4 vCPU, 16 GB RAM)"),
];

pub const AZURE_VM_SIZES: &[SelectOption] = &[
    opt("Standard_DS2_v2", "Standard_DS2_v2 (2 vCPU, 7 GB RAM)"),
    opt("Standard_DS3_v2", "Standard_DS3_v2 (4 vCPU, 14 GB RAM)"),
    opt("Standard_D4s_v3", "Standard_D4s_v3 (4 vCPU, 16 GB RAM)"),
];

/// Offered for every provider.
pub const KUBERNETES_VERSIONS: &[SelectOption] = &[
    opt("1.28", "Kubernetes 1.28"),
    opt("1.29", "Kubernetes 1.29"),
    opt("1.30", "Kubernetes 1.30"),
];

pub fn contains(options: &[SelectOption], value: &str) -> bool {
    options.iter().any(|o| o.value == value)
}
