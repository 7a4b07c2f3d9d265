use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, LitInt, Pat};

/// Time a function when the `perf_stats` feature is enabled.
///
/// The function body is wrapped with a guard that logs its wall-clock
/// duration on exit through Bevy's `info!`. Without `perf_stats` the guard
/// is compiled out entirely.
///
/// # Features
/// - Optional threshold in microseconds: only slower calls are logged
/// - Auto-detects a `count: usize` parameter and also logs the
///   per-item cost, which is how batch evaluators report throughput
///
/// # Example
/// ```ignore
/// #[profile]
/// fn build_tables() -> TrigTables { ... }
///
/// #[profile(50)] // log only when slower than 50us
/// pub fn run_scenario(math: &GameMath, seed: u64, count: usize) -> DeterminismTrace { ... }
/// ```
#[proc_macro_attribute]
pub fn profile(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let threshold_us: u128 = if attr.is_empty() {
        0
    } else {
        let lit = parse_macro_input!(attr as LitInt);
        match lit.base10_parse() {
            Ok(v) => v,
            Err(e) => return e.to_compile_error().into(),
        }
    };

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let fn_name_str = sig.ident.to_string();

    let has_count_param = sig.inputs.iter().any(|arg| {
        if let FnArg::Typed(pat_type) = arg {
            if let Pat::Ident(pat_ident) = &*pat_type.pat {
                let ty = &pat_type.ty;
                return pat_ident.ident == "count" && quote!(#ty).to_string() == "usize";
            }
        }
        false
    });

    let profile_guard_def = if has_count_param {
        quote! {
            struct ProfileGuard {
                name: &'static str,
                start: std::time::Instant,
                count: usize,
            }
            impl Drop for ProfileGuard {
                fn drop(&mut self) {
                    let elapsed = self.start.elapsed();
                    if elapsed.as_micros() >= #threshold_us {
                        let per_item = elapsed.as_nanos() / (self.count.max(1) as u128);
                        bevy::prelude::info!(
                            "[PERF] {}: {:?} for {} items ({} ns/item)",
                            self.name, elapsed, self.count, per_item
                        );
                    }
                }
            }
            ProfileGuard {
                name: #fn_name_str,
                start: std::time::Instant::now(),
                count,
            }
        }
    } else {
        quote! {
            struct ProfileGuard {
                name: &'static str,
                start: std::time::Instant,
            }
            impl Drop for ProfileGuard {
                fn drop(&mut self) {
                    let elapsed = self.start.elapsed();
                    if elapsed.as_micros() >= #threshold_us {
                        bevy::prelude::info!("[PERF] {}: {:?}", self.name, elapsed);
                    }
                }
            }
            ProfileGuard {
                name: #fn_name_str,
                start: std::time::Instant::now(),
            }
        }
    };

    let output = quote! {
        #(#attrs)*
        #vis #sig {
            #[cfg(feature = "perf_stats")]
            let _profile_timer = {
                #profile_guard_def
            };

            #block
        }
    };

    output.into()
}
