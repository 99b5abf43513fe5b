pub mod tcp_port_probe;
