pub mod u510_load_ecommerce_csv;
