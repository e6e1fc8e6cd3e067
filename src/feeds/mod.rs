pub mod csv_path;
