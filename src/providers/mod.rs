//! Remote services.

pub mod supabase;
