//! Headline sources.
//!
//! Each source turns a [`FilterSelection`](crate::models::FilterSelection) into
//! a list of [`Article`](crate::models::Article)s with a single request.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | NewsAPI | [`newsapi`] | `top-headlines` JSON API | Requires API key |
//!
//! A source never fails the run: errors are reported alongside an empty
//! article list so the caller can show them and carry on.

pub mod newsapi;
