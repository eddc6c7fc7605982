//! Fixed instruction sent alongside every image

/// Indonesian instruction asking for the full classification report
pub const CLASSIFICATION_PROMPT: &str = "Analisis gambar ini dan identifikasi hewan yang ada di dalamnya.

Berikan klasifikasi lengkap termasuk:
- Nama umum dalam Bahasa Indonesia
- Nama ilmiah (Latin)
- Nama dalam Bahasa Inggris
- Taksonomi lengkap (Kingdom, Phylum, Class, Order, Family, Genus, Species)
- Kategori umum (Mamalia, Reptil, Burung, Ikan, Amfibi, Serangga, dll.)
- Habitat alami
- Jenis pola makan
- Status konservasi IUCN
- 3 fakta menarik tentang hewan tersebut dalam Bahasa Indonesia
- Tingkat kepercayaan identifikasi (0-100)
- Deskripsi singkat dalam Bahasa Indonesia

Jika gambar tidak mengandung hewan, set isAnimal ke false dan isi field lainnya dengan null/kosong.";
