//! Built-in product catalog

use semver::Version;

use crate::matrix::definition::Declarations;
use crate::matrix::error::MatrixError;
use crate::matrix::property::{PropertyName::*, VersionRule};
use crate::matrix::registry::ProductRegistry;

/// Create a registry populated with the built-in products
pub fn default_registry() -> Result<ProductRegistry, MatrixError> {
    let mut registry = ProductRegistry::new();
    register_defaults(&mut registry)?;
    Ok(registry)
}

/// Register the built-in products into an existing registry
pub fn register_defaults(registry: &mut ProductRegistry) -> Result<(), MatrixError> {
    registry.register(
        "angrychef",
        Declarations::new()
            .constant(ProductName, "Angry Chef Client")
            .constant(PackageName, "angrychef")
            .not_available(DownloadsProductPageUrl),
    )?;

    registry.register(
        "automate",
        Declarations::new()
            .constant(ProductName, "Chef Automate")
            .rule(
                PackageName,
                VersionRule::new("delivery").starting_at(Version::new(0, 7, 0), "automate"),
            )
            .rule(
                CtlCommand,
                VersionRule::new("delivery-ctl")
                    .starting_at(Version::new(0, 7, 0), "automate-ctl"),
            )
            .constant(ConfigFile, "/etc/delivery/delivery.rb")
            .constant(GithubRepo, "chef/automate"),
    )?;

    registry.register(
        "chef",
        Declarations::new()
            .constant(ProductName, "Chef Infra Client")
            .constant(PackageName, "chef"),
    )?;

    registry.register(
        "chef-backend",
        Declarations::new()
            .constant(ProductName, "Chef Backend")
            .constant(PackageName, "chef-backend")
            .constant(CtlCommand, "chef-backend-ctl")
            .constant(ConfigFile, "/etc/chef-backend/chef-backend.rb")
            .not_available(DownloadsProductPageUrl),
    )?;

    registry.register(
        "chef-server",
        Declarations::new()
            .constant(ProductName, "Chef Infra Server")
            .rule(
                PackageName,
                VersionRule::new("chef-server")
                    .starting_at(Version::new(12, 0, 0), "chef-server-core"),
            )
            .constant(CtlCommand, "chef-server-ctl")
            .rule(
                ConfigFile,
                VersionRule::new("/etc/chef-server/chef-server.rb")
                    .starting_at(Version::new(12, 0, 0), "/etc/opscode/chef-server.rb"),
            )
            .rule(
                InstallPath,
                VersionRule::new("/opt/chef-server")
                    .starting_at(Version::new(12, 0, 0), "/opt/opscode"),
            )
            .constant(OmnibusProject, "chef-server"),
    )?;

    registry.register(
        "chef-workstation",
        Declarations::new()
            .constant(ProductName, "Chef Workstation")
            .constant(PackageName, "chef-workstation"),
    )?;

    registry.register(
        "chefdk",
        Declarations::new()
            .constant(ProductName, "Chef Development Kit")
            .constant(PackageName, "chefdk")
            .constant(GithubRepo, "chef/chef-dk"),
    )?;

    registry.register(
        "compliance",
        Declarations::new()
            .constant(ProductName, "Chef Compliance")
            .constant(PackageName, "chef-compliance")
            .constant(CtlCommand, "chef-compliance-ctl")
            .constant(ConfigFile, "/etc/chef-compliance/chef-compliance.rb"),
    )?;

    registry.register(
        "ha",
        Declarations::new()
            .constant(ProductName, "Chef Server High Availability addon")
            .constant(PackageName, "chef-ha")
            .constant(ConfigFile, "/etc/opscode/chef-server.rb")
            .not_available(DownloadsProductPageUrl),
    )?;

    registry.register(
        "harmony",
        Declarations::new()
            .constant(ProductName, "Harmony - Omnibus Integration Internal Test Project")
            .constant(PackageName, "harmony")
            .not_available(DownloadsProductPageUrl),
    )?;

    registry.register(
        "inspec",
        Declarations::new()
            .constant(ProductName, "Chef InSpec")
            .constant(PackageName, "inspec"),
    )?;

    registry.register(
        "mac-bootstrapper",
        Declarations::new()
            .constant(ProductName, "Habitat Mac Bootstrapper")
            .constant(PackageName, "mac-bootstrapper")
            .not_available(DownloadsProductPageUrl),
    )?;

    registry.register(
        "manage",
        Declarations::new()
            .constant(ProductName, "Management Console")
            .rule(
                PackageName,
                VersionRule::new("opscode-manage")
                    .starting_at(Version::new(2, 0, 0), "chef-manage"),
            )
            .rule(
                CtlCommand,
                VersionRule::new("opscode-manage-ctl")
                    .starting_at(Version::new(2, 0, 0), "chef-manage-ctl"),
            )
            .rule(
                ConfigFile,
                VersionRule::new("/etc/opscode-manage/manage.rb")
                    .starting_at(Version::new(2, 0, 0), "/etc/chef-manage/manage.rb"),
            )
            .constant(GithubRepo, "chef/chef-manage"),
    )?;

    registry.register(
        "omnibus-toolchain",
        Declarations::new()
            .constant(ProductName, "Omnibus Toolchain")
            .constant(PackageName, "omnibus-toolchain")
            .not_available(DownloadsProductPageUrl),
    )?;

    registry.register(
        "private-chef",
        Declarations::new()
            .constant(ProductName, "Enterprise Chef (legacy)")
            .constant(PackageName, "private-chef")
            .constant(CtlCommand, "private-chef-ctl")
            .constant(ConfigFile, "/etc/opscode/private-chef.rb")
            .constant(InstallPath, "/opt/opscode")
            .not_available(DownloadsProductPageUrl),
    )?;

    registry.register(
        "push-jobs-client",
        Declarations::new()
            .constant(ProductName, "Chef Push Client")
            .rule(
                PackageName,
                VersionRule::new("opscode-push-jobs-client")
                    .starting_at(Version::new(1, 3, 0), "push-jobs-client"),
            )
            .constant(GithubRepo, "chef/opscode-pushy-client"),
    )?;

    registry.register(
        "push-jobs-server",
        Declarations::new()
            .constant(ProductName, "Chef Push Server")
            .rule(
                PackageName,
                VersionRule::new("opscode-push-jobs-server")
                    .starting_at(Version::new(2, 2, 0), "chef-push-jobs-server"),
            )
            .rule(
                CtlCommand,
                VersionRule::new("opscode-push-jobs-server-ctl")
                    .starting_at(Version::new(2, 2, 0), "chef-push-jobs-server-ctl"),
            )
            .constant(
                ConfigFile,
                "/etc/opscode-push-jobs-server/opscode-push-jobs-server.rb",
            )
            .constant(GithubRepo, "chef/opscode-pushy-server"),
    )?;

    registry.register(
        "reporting",
        Declarations::new()
            .constant(ProductName, "Chef Server Reporting")
            .constant(PackageName, "opscode-reporting")
            .constant(CtlCommand, "opscode-reporting-ctl")
            .constant(ConfigFile, "/etc/opscode-reporting/opscode-reporting.rb"),
    )?;

    registry.register(
        "supermarket",
        Declarations::new()
            .constant(ProductName, "Supermarket")
            .constant(PackageName, "supermarket")
            .constant(CtlCommand, "supermarket-ctl")
            .constant(ConfigFile, "/etc/supermarket/supermarket.json"),
    )?;

    Ok(())
}
