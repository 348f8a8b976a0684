mod display_manager_tests;
mod table_printer_tests;
