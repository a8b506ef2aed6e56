pub mod animal_repository;
pub mod diet_repository;
pub mod medical_repository;
pub mod report_repository;
pub mod staff_repository;

pub use animal_repository::AnimalRepository;
pub use diet_repository::DietRepository;
pub use medical_repository::MedicalRepository;
pub use report_repository::ReportRepository;
pub use staff_repository::StaffRepository;
