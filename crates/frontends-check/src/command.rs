//! Command line for the Nagios `check_http` plugin.

/// Where the Nagios plugins package installs `check_http`.
pub const CHECK_HTTP_PATH: &str = "/usr/lib/nagios/plugins/check_http";

/// Build the `check_http` invocation for a local port.
pub fn build_check_http_command(port: u16) -> String {
    build_check_http_command_with(CHECK_HTTP_PATH, port)
}

/// Same as [`build_check_http_command`] with an explicit plugin path.
pub fn build_check_http_command_with(check_http_path: &str, port: u16) -> String {
    format!("{check_http_path} -H localhost -p {port}")
}
