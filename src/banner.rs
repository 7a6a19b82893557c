//! Startup banner and farewell.

use std::time::Duration;

use crate::consts::format_millis;

/// Session settings shown in the startup banner.
pub struct BannerInfo<'a> {
    pub source: &'a str,
    pub endpoint: Option<&'a str>,
    pub min_loading: Duration,
    pub session: &'a str,
}

pub fn banner_text(info: &BannerInfo) -> String {
    format!(
        r#"
   ╔═══════════════════════════════════════╗
   ║        M E O W - T I V A T I O N      ║
   ║   a quote and a cat, whenever needed  ║
   ╚═══════════════════════════════════════╝

   version   {}
   source    {}
   endpoint  {}
   loading   at least {}
   session   {}
"#,
        env!("CARGO_PKG_VERSION"),
        info.source,
        info.endpoint.unwrap_or("(not configured)"),
        format_millis(info.min_loading),
        info.session,
    )
}

pub fn print_banner(info: &BannerInfo) {
    println!("{}", banner_text(info));
}

pub fn print_farewell() {
    println!("bye, and stay pawsitive. 🐱");
}
