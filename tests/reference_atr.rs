mod fixtures;

use fixtures::reference_test;

// Wilder smoothing with a running-mean warm-up over true range.
reference_test!(atr_14, Atr, AtrConfig::new(14), "tests/fixtures/data/atr-14.csv", 1e-6);

// Mean of true range for the first 100 bars, so this covers the ramp.
reference_test!(
    atr_100,
    Atr,
    AtrConfig::new(100),
    "tests/fixtures/data/atr-100.csv",
    1e-6
);
