//! User-facing status texts shown when the server gives no message of
//! its own.

pub const LOGIN_FAILED: &str = "Login gagal";
pub const REGISTER_SUCCEEDED: &str = "Registrasi berhasil! Silakan login.";
pub const REGISTER_FAILED: &str = "Terjadi kesalahan saat registrasi.";
pub const CHECK_IN_FAILED: &str = "Gagal melakukan check-in. Periksa koneksi ke server.";
pub const CHECK_OUT_FAILED: &str = "Gagal melakukan check-out. Periksa koneksi ke server.";
pub const REPORT_FAILED: &str = "Gagal terhubung ke server. Periksa koneksi internet Anda.";
pub const SESSION_REQUIRED: &str = "Sesi tidak ditemukan. Silakan login kembali.";

pub const LOCATION_PERMISSION_DENIED: &str = "Izin lokasi ditolak.";
pub const LOCATION_TIMEOUT: &str = "Waktu permintaan lokasi habis.";
pub const LOCATION_UNAVAILABLE: &str = "Informasi lokasi tidak tersedia.";
pub const LOCATION_UNSUPPORTED: &str = "Geolocation tidak didukung oleh perangkat ini.";

pub const CAMERA_UNAVAILABLE: &str = "Kamera tidak dapat diakses.";
pub const CHECK_OUT_PENDING: &str = "Belum Check-Out";
pub const NOT_AVAILABLE: &str = "N/A";
pub const PHOTO_UNAVAILABLE: &str = "Tidak tersedia";
pub const REPORT_EMPTY: &str = "Tidak ada data yang ditemukan";
pub const REPORT_EMPTY_HINT: &str =
    "Coba ubah filter pencarian Anda atau pastikan server API berjalan dengan benar.";
