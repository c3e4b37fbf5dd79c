mod supabase;

pub use supabase::SupabaseClient;
