//! Static classification tables for packages that predate schema tagging.

use crate::PackageCategory;

/// Publisher used when neither an override nor the schema names one.
pub const DEFAULT_PUBLISHER: &str = "Pulumi";

/// Category used when no rule produces a match.
pub const DEFAULT_CATEGORY: PackageCategory = PackageCategory::Cloud;

/// Packages highlighted on the registry front page.
pub const FEATURED_PACKAGES: [&str; 4] = ["aws", "azure-native", "gcp", "kubernetes"];

// Packages under the pulumi org without a `category/` tag in their schema.
const CATEGORY_LOOKUP: &[(&str, PackageCategory)] = &[
    ("aiven", PackageCategory::Cloud),
    ("akamai", PackageCategory::Network),
    ("alicloud", PackageCategory::Cloud),
    ("artifactory", PackageCategory::Infrastructure),
    ("auth0", PackageCategory::Infrastructure),
    ("aws", PackageCategory::Cloud),
    ("azure", PackageCategory::Cloud),
    ("azure-native", PackageCategory::Cloud),
    ("azuread", PackageCategory::Cloud),
    ("azuredevops", PackageCategory::Infrastructure),
    ("civo", PackageCategory::Cloud),
    ("cloudamqp", PackageCategory::Infrastructure),
    ("cloudflare", PackageCategory::Network),
    ("consul", PackageCategory::Infrastructure),
    ("datadog", PackageCategory::Monitoring),
    ("digitalocean", PackageCategory::Cloud),
    ("dnsimple", PackageCategory::Network),
    ("docker", PackageCategory::Infrastructure),
    ("f5bigip", PackageCategory::Network),
    ("fastly", PackageCategory::Network),
    ("gcp", PackageCategory::Cloud),
    ("github", PackageCategory::VersionControl),
    ("gitlab", PackageCategory::VersionControl),
    ("hcloud", PackageCategory::Cloud),
    ("kafka", PackageCategory::Infrastructure),
    ("keycloak", PackageCategory::Infrastructure),
    ("kong", PackageCategory::Network),
    ("kubernetes", PackageCategory::Cloud),
    ("linode", PackageCategory::Cloud),
    ("mailgun", PackageCategory::Infrastructure),
    ("mongodbatlas", PackageCategory::Database),
    ("mysql", PackageCategory::Database),
    ("newrelic", PackageCategory::Monitoring),
    ("ns1", PackageCategory::Network),
    ("okta", PackageCategory::Infrastructure),
    ("openstack", PackageCategory::Cloud),
    ("opsgenie", PackageCategory::Monitoring),
    ("pagerduty", PackageCategory::Monitoring),
    ("postgresql", PackageCategory::Database),
    ("rabbitmq", PackageCategory::Infrastructure),
    ("random", PackageCategory::Utility),
    ("rancher2", PackageCategory::Infrastructure),
    ("signalfx", PackageCategory::Monitoring),
    ("snowflake", PackageCategory::Database),
    ("splunk", PackageCategory::Monitoring),
    ("spotinst", PackageCategory::Cloud),
    ("sumologic", PackageCategory::Monitoring),
    ("tls", PackageCategory::Utility),
    ("vault", PackageCategory::Infrastructure),
    ("venafi", PackageCategory::Infrastructure),
    ("vsphere", PackageCategory::Cloud),
    ("wavefront", PackageCategory::Monitoring),
];

// Display titles for pulumi org packages whose schema lacks `displayName`.
const TITLE_LOOKUP: &[(&str, &str)] = &[
    ("aiven", "Aiven"),
    ("akamai", "Akamai"),
    ("alicloud", "AliCloud"),
    ("auth0", "Auth0"),
    ("aws", "AWS Classic"),
    ("aws-native", "AWS Native"),
    ("azure", "Azure Classic"),
    ("azure-native", "Azure Native"),
    ("azuread", "Azure Active Directory (Azure AD)"),
    ("azuredevops", "Azure DevOps"),
    ("cloudflare", "Cloudflare"),
    ("consul", "HashiCorp Consul"),
    ("datadog", "Datadog"),
    ("digitalocean", "DigitalOcean"),
    ("docker", "Docker"),
    ("gcp", "Google Cloud (GCP) Classic"),
    ("github", "GitHub"),
    ("gitlab", "GitLab"),
    ("kubernetes", "Kubernetes"),
    ("mongodbatlas", "MongoDB Atlas"),
    ("mysql", "MySQL"),
    ("newrelic", "New Relic"),
    ("postgresql", "PostgreSQL"),
    ("random", "random"),
    ("tls", "TLS"),
    ("vault", "HashiCorp Vault"),
    ("vsphere", "vSphere"),
];

/// Category recorded for `package` in the static lookup table.
pub fn category_for_package(package: &str) -> Option<PackageCategory> {
    CATEGORY_LOOKUP
        .iter()
        .find(|(name, _)| *name == package)
        .map(|(_, category)| *category)
}

/// Title recorded for `package` in the static lookup table.
pub fn title_for_package(package: &str) -> Option<&'static str> {
    TITLE_LOOKUP
        .iter()
        .find(|(name, _)| *name == package)
        .map(|(_, title)| *title)
}

/// Returns `true` if `package` is featured on the registry.
pub fn is_featured(package: &str) -> bool {
    FEATURED_PACKAGES.contains(&package)
}
