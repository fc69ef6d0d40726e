pub mod rfm_testkit;
