//! The auto-name transform.
//!
//! Rewrites `let x = some_call(...);` into `let x = some_call(...).named("x");`
//! so that every variable carries the identifier it is assigned to. Only
//! single-identifier bindings with a call initializer qualify; destructuring
//! patterns and non-call initializers pass through untouched, as do calls that
//! already name themselves.

use syn::ext::IdentExt;
use syn::visit_mut::{self, VisitMut};
use syn::{Expr, Ident, Item, LitStr, Local, Pat};

/// `syn::visit_mut` pass injecting `.named("...")` calls.
#[derive(Default)]
pub struct AutoName {
    /// How many initializers were rewritten.
    pub rewrites: usize,
}

impl VisitMut for AutoName {
    fn visit_item_mut(&mut self, _item: &mut Item) {
        // Items nested in the body are functions (or types) of their own;
        // the rewrite applies to the model function alone.
    }

    fn visit_local_mut(&mut self, local: &mut Local) {
        visit_mut::visit_local_mut(self, local);
        let Some(init) = &mut local.init else { return };
        if init.diverge.is_some() {
            // `let ... else` refutable bindings stay untouched.
            return;
        }
        let Some(ident) = binding_ident(&local.pat) else { return };
        let expr = init.expr.as_ref();
        if !is_call(expr) || names_itself(expr) {
            return;
        }
        let span = ident.span();
        let name = LitStr::new(&ident.unraw().to_string(), span);
        let receiver = expr.clone();
        init.expr = Box::new(syn::parse_quote_spanned!(span=> #receiver.named(#name)));
        self.rewrites += 1;
    }
}

/// The single plain identifier bound by `pat`, if there is one.
///
/// `mut` bindings and ascribed types (`let x: T = ...`) qualify; `ref`
/// bindings, subpatterns and any destructuring form do not.
fn binding_ident(pat: &Pat) -> Option<&Ident> {
    match pat {
        Pat::Ident(pat) if pat.by_ref.is_none() && pat.subpat.is_none() => Some(&pat.ident),
        Pat::Type(pat) => binding_ident(&pat.pat),
        _ => None,
    }
}

/// Does the initializer qualify for naming at all?
fn is_call(expr: &Expr) -> bool {
    matches!(expr, Expr::Call(_) | Expr::MethodCall(_))
}

/// Does the call chain already carry an explicit name?
///
/// Walks the receiver spine of a method-call chain looking for `.named(...)`;
/// a plain call to a function whose path ends in `named` counts too.
fn names_itself(expr: &Expr) -> bool {
    let mut cursor = expr;
    loop {
        match cursor {
            Expr::MethodCall(call) => {
                if call.method == "named" {
                    return true;
                }
                cursor = &call.receiver;
            }
            Expr::Call(call) => {
                if let Expr::Path(path) = call.func.as_ref() {
                    return path
                        .path
                        .segments
                        .last()
                        .is_some_and(|segment| segment.ident == "named");
                }
                return false;
            }
            Expr::Paren(inner) => cursor = &inner.expr,
            Expr::Try(inner) => cursor = &inner.expr,
            _ => return false,
        }
    }
}
