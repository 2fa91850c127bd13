pub mod batch_hook;
