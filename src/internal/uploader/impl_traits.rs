pub mod impl_transport;
