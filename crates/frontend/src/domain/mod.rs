pub mod a001_customer;
pub mod a002_person_employee;
pub mod a003_maintenance;
pub mod a004_warranty;
