#![no_main]

use libfuzzer_sys::fuzz_target;
use recipe_stats::window::DeliveryWindow;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(window) = DeliveryWindow::parse(input) {
            // A parsed window always renders hours back into 1..=12.
            for hour in [window.start, window.end] {
                assert!((1..=12).contains(&hour.value));
            }
            assert_eq!(window.contains(&window), window.is_same_day());
        }
    }
});
