//! Procedural macros for the rpcq typed procedure client.
//!
//! This crate provides `#[derive(Procedure)]`, binding a unit struct to one route of
//! the schema: its procedure key, its input type and its output type.
//!
//! # Example
//!
//! ```ignore
//! use rpcq::prelude::*;
//!
//! #[derive(Procedure)]
//! #[procedure(key = "GET /users/{username}", input = UserInput, output = User)]
//! pub struct GetUser;
//!
//! let user = client.query::<GetUser>(input.into()).await?;
//! ```

mod attrs;
mod expand;

use proc_macro::TokenStream;

/// Derive `rpcq::Procedure` and the matching kind marker.
///
/// # Attributes
///
/// - `key` (required): the procedure key, `"METHOD /path/{param}"`
/// - `input` (optional): the input type, `()` when omitted
/// - `output` (optional): the success payload type, `serde_json::Value` when omitted
///
/// `GET` keys also implement `rpcq::QueryProcedure`; every other method implements
/// `rpcq::MutationProcedure`.
///
/// The key is checked at compile time: it needs a space separator, one of
/// `GET`, `POST`, `PUT`, `PATCH`, `DELETE`, a path starting with `/` and balanced
/// `{placeholder}` braces. A path with placeholders needs an `input` type.
///
/// # Example
///
/// ```ignore
/// #[derive(Procedure)]
/// #[procedure(key = "POST /items", input = CreateItemInput, output = Item)]
/// pub struct CreateItem;
///
/// #[derive(Procedure)]
/// #[procedure(key = "GET /health")]
/// pub struct Health;
/// ```
#[proc_macro_derive(Procedure, attributes(procedure))]
pub fn derive_procedure(input: TokenStream) -> TokenStream {
    expand::expand_procedure_derive(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
