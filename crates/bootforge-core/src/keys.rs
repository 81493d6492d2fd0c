// Namespaced settings keys shared by the screens, the reconciler, and
// the validators. The part before `/` is the top-level section of the
// persisted settings document.

pub const ADMIN_INTERFACE: &str = "ADMIN_NETWORK/interface";
pub const ADMIN_NETMASK: &str = "ADMIN_NETWORK/netmask";
pub const ADMIN_MAC: &str = "ADMIN_NETWORK/mac";
pub const ADMIN_IPADDRESS: &str = "ADMIN_NETWORK/ipaddress";
pub const DHCP_POOL_START: &str = "ADMIN_NETWORK/dhcp_pool_start";
pub const DHCP_POOL_END: &str = "ADMIN_NETWORK/dhcp_pool_end";
pub const DHCP_GATEWAY: &str = "ADMIN_NETWORK/dhcp_gateway";

pub const BOOTSTRAP_FLAVOR: &str = "BOOTSTRAP/flavor";
pub const BOOTSTRAP_HTTP_PROXY: &str = "BOOTSTRAP/http_proxy";
pub const BOOTSTRAP_HTTPS_PROXY: &str = "BOOTSTRAP/https_proxy";
pub const BOOTSTRAP_REPOS: &str = "BOOTSTRAP/repos";
pub const BOOTSTRAP_SKIP_BUILD: &str = "BOOTSTRAP/skip_default_img_build";
