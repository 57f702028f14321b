//! Binder contracts: target binding, source binding, CTE substitution,
//! COPY handling and error reporting.

mod common;
mod copy_contract;
mod cte_contract;
mod target_contract;
