mod fingerprint_test;
