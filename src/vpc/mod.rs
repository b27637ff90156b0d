//! VPC infrastructure
//!
//! Handles for the VPC API families. Every handle borrows an
//! [`IbmClient`](crate::IbmClient) and accepts names or ids wherever it takes
//! an identifier.
//!
//! - [`geography`] - Regions and zones
//! - [`vpcs`] - VPCs, address prefixes and routes
//! - [`subnets`] - Subnets and their reserved IPs
//! - [`public_gateways`] - Public gateways
//! - [`network_acls`] - Network ACLs and rules
//! - [`security_groups`] - Security groups, rules and interfaces
//! - [`floating_ips`] - Floating IPs
//! - [`load_balancers`] - Load balancers, listeners, pools and members
//! - [`vpn`] - VPN gateways, connections, IKE and IPsec policies
//! - [`images`] - Images and operating systems
//! - [`keys`] - SSH keys
//! - [`volumes`] - Block storage volumes and profiles
//! - [`instances`] - Virtual server instances

pub mod floating_ips;
pub mod geography;
pub mod images;
pub mod instances;
pub mod keys;
pub mod load_balancers;
pub mod network_acls;
pub mod public_gateways;
pub mod security_groups;
pub mod subnets;
pub mod volumes;
pub mod vpcs;
pub mod vpn;

pub use floating_ips::{FloatingIps, ReserveFloatingIp};
pub use geography::Geography;
pub use images::{CreateImage, Images};
pub use instances::{AttachVolume, CreateInstance, InstanceAction, Instances};
pub use keys::{CreateKey, Keys};
pub use load_balancers::{CreateListener, CreateLoadBalancer, CreateMember, CreatePool, HealthMonitor, LoadBalancers};
pub use network_acls::{CreateAclRule, CreateNetworkAcl, NetworkAcls};
pub use public_gateways::{CreatePublicGateway, PublicGateways};
pub use security_groups::{CreateSecurityGroup, CreateSecurityGroupRule, SecurityGroups};
pub use subnets::{CreateSubnet, Subnets};
pub use volumes::{CreateVolume, Volumes};
pub use vpcs::{CreateAddressPrefix, CreateRoute, CreateVpc, Vpcs};
pub use vpn::{CreateIkePolicy, CreateIpsecPolicy, CreateVpnConnection, CreateVpnGateway, VpnGateways};
