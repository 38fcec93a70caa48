pub mod grower;
