mod bit_array_tests;
mod codec_tests;
mod sparse_array_tests;
