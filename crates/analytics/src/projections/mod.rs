pub mod p910_sales_records;
