//! Recording fakes for the host traits.
