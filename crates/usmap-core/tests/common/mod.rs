pub mod mapping_server;
