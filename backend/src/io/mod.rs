//! Interface layer exposing the domain to clients over HTTP.

pub mod rest;
