mod agreement_test;
mod employee_test;
mod expiry_test;
mod property_test;
mod reporting_test;
mod router_test;
mod verification_test;
