pub mod banner;
pub mod config;
pub mod consts;
pub mod logging;
pub mod presenter;
pub mod quote;
pub mod requester;
pub mod screens;
pub mod source;
pub mod spinner;
pub mod storage;
